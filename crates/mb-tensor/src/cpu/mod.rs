pub mod parallel;

use crate::backend::MatmulBackend;
use crate::error::Result;
use crate::kernel;

pub use parallel::ThreadPoolBackend;

/// Single-threaded CPU backend.
///
/// The textbook triple loop: rows, then columns, then the shared dimension.
/// Serves as the reference the other backends are checked against.
#[derive(Debug, Clone)]
pub struct SequentialBackend;

impl SequentialBackend {
    pub fn new() -> Self {
        SequentialBackend
    }
}

impl Default for SequentialBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MatmulBackend for SequentialBackend {
    fn name(&self) -> &str {
        "sequential"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        kernel::check_operands(a, b, m, k, n)?;

        let mut c = vec![0.0f64; m * n];
        for (i, row) in c.chunks_mut(n.max(1)).enumerate() {
            kernel::fill_row(a, b, i, k, n, row);
        }
        Ok(c)
    }
}
