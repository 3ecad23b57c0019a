use std::path::PathBuf;

use mb_gen::{SeedMode, ValueDistribution};
use mb_io::TextLayout;
use mb_tensor::{ExecutionStrategy, LaunchConfig, Shape};

use crate::error::{BenchError, Result};

/// Matrices with both dimensions at or below this are printed in full.
pub const DEFAULT_PRINT_LIMIT: usize = 8;

/// Default tolerance when comparing the product against a reference file.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Everything one benchmark run needs.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Rows of A.
    pub left_rows: usize,
    /// Columns of A. Also the rows of B.
    pub inner: usize,
    /// Columns of B.
    pub right_cols: usize,
    pub strategy: ExecutionStrategy,
    pub seed: SeedMode,
    pub distribution: ValueDistribution,
    pub layout: TextLayout,
    /// Where to write A, B, and the product. `None` skips the write.
    pub write_left: Option<PathBuf>,
    pub write_right: Option<PathBuf>,
    pub write_result: Option<PathBuf>,
    /// Reference product to compare against, shape inferred from the file.
    pub verify: Option<PathBuf>,
    pub tolerance: f64,
    pub print_limit: usize,
}

impl Default for BenchConfig {
    /// 100x1000 @ 1000x100, single-threaded, fixed seed 0, integers in 0..=14.
    fn default() -> Self {
        Self {
            left_rows: 100,
            inner: 1000,
            right_cols: 100,
            strategy: ExecutionStrategy::Sequential,
            seed: SeedMode::Fixed(0),
            distribution: ValueDistribution::default(),
            layout: TextLayout::default(),
            write_left: None,
            write_right: None,
            write_result: None,
            verify: None,
            tolerance: DEFAULT_TOLERANCE,
            print_limit: DEFAULT_PRINT_LIMIT,
        }
    }
}

impl BenchConfig {
    pub fn left_shape(&self) -> Result<Shape> {
        Ok(Shape::new(self.left_rows, self.inner)?)
    }

    pub fn right_shape(&self) -> Result<Shape> {
        Ok(Shape::new(self.inner, self.right_cols)?)
    }

    /// Reject configurations that would fail partway through a run.
    pub fn validate(&self) -> Result<()> {
        self.left_shape()?.product(&self.right_shape()?)?;
        self.distribution.validate()?;
        match self.strategy {
            ExecutionStrategy::ThreadParallel { threads: 0 } => {
                return Err(BenchError::Config("thread count must be > 0".to_string()));
            }
            ExecutionStrategy::DeviceParallel { tile: 0 } => {
                return Err(BenchError::Config("tile size must be > 0".to_string()));
            }
            ExecutionStrategy::DeviceParallel { tile } => {
                LaunchConfig::new(self.left_rows, self.right_cols, tile)?;
            }
            _ => {}
        }
        if let TextLayout::FixedWidth(0) = self.layout {
            return Err(BenchError::Config("field width must be > 0".to_string()));
        }
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(BenchError::Config(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

/// Parameters for reading a matrix file back.
#[derive(Debug, Clone)]
pub struct ReadConfig {
    pub path: PathBuf,
    /// Explicit (rows, cols); `None` infers the shape from the file.
    pub shape: Option<(usize, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = BenchConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.left_shape().unwrap(), Shape::new(100, 1000).unwrap());
        assert_eq!(cfg.right_shape().unwrap(), Shape::new(1000, 100).unwrap());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let cfg = BenchConfig {
            inner: 0,
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::Matrix(_))));
    }

    #[test]
    fn test_oversized_product_rejected() {
        let cfg = BenchConfig {
            left_rows: 1 << 40,
            inner: 1,
            right_cols: 1 << 40,
            ..BenchConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(BenchError::Matrix(mb_tensor::MatrixError::TooLarge { .. }))
        ));
    }

    #[test]
    fn test_bad_strategy_parameters_rejected() {
        let cfg = BenchConfig {
            strategy: ExecutionStrategy::ThreadParallel { threads: 0 },
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::Config(_))));

        let cfg = BenchConfig {
            strategy: ExecutionStrategy::DeviceParallel { tile: 0 },
            ..BenchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_untileable_output_rejected() {
        let cfg = BenchConfig {
            left_rows: 12,
            strategy: ExecutionStrategy::DeviceParallel { tile: 5 },
            ..BenchConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(BenchError::Matrix(
                mb_tensor::MatrixError::InvalidTileConfiguration { .. }
            ))
        ));
    }

    #[test]
    fn test_bad_tolerance_rejected() {
        let cfg = BenchConfig {
            tolerance: f64::NAN,
            ..BenchConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_bad_range_rejected() {
        let cfg = BenchConfig {
            distribution: ValueDistribution::Integers { low: 3, high: 1 },
            ..BenchConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(BenchError::Generator(_))));
    }
}
