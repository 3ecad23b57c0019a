use std::fmt;
use std::str::FromStr;

use log::info;

use crate::backend::MatmulBackend;
use crate::cpu::{parallel::DEFAULT_THREADS, SequentialBackend, ThreadPoolBackend};
use crate::device::{GridBackend, DEFAULT_TILE};
use crate::error::{MatrixError, Result};

/// How a multiplication is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// One thread, plain triple loop.
    #[default]
    Sequential,
    /// Output rows partitioned across a pool of `threads` workers.
    ThreadParallel { threads: usize },
    /// Grid launch of `tile`x`tile` blocks, one thread per output element.
    DeviceParallel { tile: usize },
}

impl ExecutionStrategy {
    /// Thread-parallel strategy with the default worker count.
    pub fn threads() -> Self {
        ExecutionStrategy::ThreadParallel {
            threads: DEFAULT_THREADS,
        }
    }

    /// Device-parallel strategy with the default tile.
    pub fn device() -> Self {
        ExecutionStrategy::DeviceParallel { tile: DEFAULT_TILE }
    }

    /// Build the backend for this strategy.
    ///
    /// With the `wgpu` feature enabled, `DeviceParallel` runs on a GPU when
    /// one is available and falls back to the host grid otherwise. Tile
    /// validation errors are never masked by the fallback.
    pub fn backend(&self) -> Result<Box<dyn MatmulBackend>> {
        match *self {
            ExecutionStrategy::Sequential => Ok(Box::new(SequentialBackend::new())),
            ExecutionStrategy::ThreadParallel { threads } => {
                Ok(Box::new(ThreadPoolBackend::new(threads)?))
            }
            ExecutionStrategy::DeviceParallel { tile } => device_backend(tile),
        }
    }
}

#[cfg(feature = "wgpu")]
fn device_backend(tile: usize) -> Result<Box<dyn MatmulBackend>> {
    match crate::device::gpu::WgpuBackend::new(tile) {
        Ok(gpu) => Ok(Box::new(gpu)),
        Err(e @ MatrixError::InvalidTileConfiguration { .. }) => Err(e),
        Err(e) => {
            info!("{}; running device grid on the host", e);
            Ok(Box::new(GridBackend::new(tile)?))
        }
    }
}

#[cfg(not(feature = "wgpu"))]
fn device_backend(tile: usize) -> Result<Box<dyn MatmulBackend>> {
    info!("device grid runs on the host (built without the wgpu feature)");
    Ok(Box::new(GridBackend::new(tile)?))
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionStrategy::Sequential => write!(f, "sequential"),
            ExecutionStrategy::ThreadParallel { threads } => write!(f, "threads({})", threads),
            ExecutionStrategy::DeviceParallel { tile } => write!(f, "device(tile={})", tile),
        }
    }
}

/// Parses the strategy kind with default parameters: `sequential`,
/// `threads`, or `device`.
impl FromStr for ExecutionStrategy {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecutionStrategy::Sequential),
            "threads" | "parallel" => Ok(ExecutionStrategy::threads()),
            "device" | "gpu" => Ok(ExecutionStrategy::device()),
            other => Err(MatrixError::UnknownStrategy(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(
            "sequential".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::Sequential
        );
        assert_eq!(
            "threads".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::ThreadParallel { threads: 16 }
        );
        assert_eq!(
            "GPU".parse::<ExecutionStrategy>().unwrap(),
            ExecutionStrategy::DeviceParallel { tile: 5 }
        );
        assert!("blas".parse::<ExecutionStrategy>().is_err());
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(
            ExecutionStrategy::Sequential.backend().unwrap().name(),
            "sequential"
        );
        assert_eq!(
            ExecutionStrategy::ThreadParallel { threads: 2 }
                .backend()
                .unwrap()
                .name(),
            "threads"
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(ExecutionStrategy::ThreadParallel { threads: 0 }
            .backend()
            .is_err());
        assert!(ExecutionStrategy::DeviceParallel { tile: 0 }
            .backend()
            .is_err());
    }

    #[test]
    fn test_oversized_tile_runs_on_host_grid() {
        // Tiles above the GPU workgroup limit still run on the host grid.
        let backend = ExecutionStrategy::DeviceParallel { tile: 20 }
            .backend()
            .unwrap();
        assert_eq!(backend.name(), "device-grid");
        let c = backend
            .matmul(&[1.0; 60], &[2.0; 60], 20, 3, 20)
            .unwrap();
        assert!(c.iter().all(|&v| v == 6.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(ExecutionStrategy::threads().to_string(), "threads(16)");
        assert_eq!(ExecutionStrategy::device().to_string(), "device(tile=5)");
    }
}
