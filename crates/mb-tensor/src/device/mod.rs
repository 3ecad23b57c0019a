//! Grid-launch execution model.
//!
//! A launch covers the output matrix with square blocks of `tile x tile`
//! threads, one thread per output element. [`GridBackend`] runs the grid on
//! the host; with the `wgpu` feature, [`gpu::WgpuBackend`] dispatches the same
//! launch to a GPU compute shader.

#[cfg(feature = "wgpu")]
pub mod gpu;

use log::debug;
use rayon::prelude::*;

use crate::backend::MatmulBackend;
use crate::error::{MatrixError, Result};
use crate::kernel;

/// Default edge length of a thread block.
pub const DEFAULT_TILE: usize = 5;

/// Grid and block dimensions for one kernel launch.
///
/// Follows the usual device convention: `x` runs along output columns and `y`
/// along output rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Number of blocks along (x = columns, y = rows).
    pub grid: (usize, usize),
    /// Threads per block along (x, y). Always (tile, tile).
    pub block: (usize, usize),
}

impl LaunchConfig {
    /// Derive the launch for an output of `rows` x `cols` elements.
    ///
    /// # Errors
    /// `InvalidTileConfiguration` if `tile` is zero, or if either output
    /// dimension is smaller than `tile` or not an exact multiple of it.
    pub fn new(rows: usize, cols: usize, tile: usize) -> Result<Self> {
        let fits = |dim: usize| tile > 0 && dim >= tile && dim % tile == 0;
        if !fits(rows) || !fits(cols) {
            return Err(MatrixError::InvalidTileConfiguration { rows, cols, tile });
        }
        Ok(LaunchConfig {
            grid: (cols / tile, rows / tile),
            block: (tile, tile),
        })
    }

    pub fn tile(&self) -> usize {
        self.block.0
    }

    pub fn blocks(&self) -> usize {
        self.grid.0 * self.grid.1
    }
}

/// Host-side grid executor.
///
/// Each block row of the grid is handed to one rayon worker, which runs every
/// block in that row and every thread within each block. Workers therefore
/// own disjoint output rows, and the call returns only once all blocks are
/// done.
#[derive(Debug, Clone)]
pub struct GridBackend {
    tile: usize,
}

impl GridBackend {
    /// # Errors
    /// `InvalidTileConfiguration` if `tile == 0`.
    pub fn new(tile: usize) -> Result<Self> {
        if tile == 0 {
            return Err(MatrixError::InvalidTileConfiguration {
                rows: 0,
                cols: 0,
                tile,
            });
        }
        Ok(GridBackend { tile })
    }
}

impl Default for GridBackend {
    fn default() -> Self {
        GridBackend { tile: DEFAULT_TILE }
    }
}

impl MatmulBackend for GridBackend {
    fn name(&self) -> &str {
        "device-grid"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        kernel::check_operands(a, b, m, k, n)?;
        // Validate the launch before the output buffer exists.
        let launch = LaunchConfig::new(m, n, self.tile)?;
        debug!(
            "device-grid: grid={:?} block={:?} ({} blocks)",
            launch.grid,
            launch.block,
            launch.blocks()
        );

        let tile = launch.tile();
        let mut c = vec![0.0f64; m * n];
        c.par_chunks_mut(tile * n)
            .enumerate()
            .for_each(|(block_y, rows)| {
                for block_x in 0..launch.grid.0 {
                    for thread_y in 0..tile {
                        for thread_x in 0..tile {
                            let row = block_y * tile + thread_y;
                            let col = block_x * tile + thread_x;
                            rows[thread_y * n + col] = kernel::dot(a, b, row, col, k, n);
                        }
                    }
                }
            });
        Ok(c)
    }
}
