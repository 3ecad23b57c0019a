use std::fmt::Debug;

use crate::error::Result;

/// Trait for pluggable matrix multiplication backends (sequential, thread
/// pool, device grid).
///
/// Data is passed in as row-major slices and returned as an owned vector.
/// Every backend accumulates each output element with [`crate::kernel::dot`],
/// so results only differ in how the work is scheduled.
pub trait MatmulBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "sequential", "threads").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: row-major data of shape [m, k]
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>>;
}
