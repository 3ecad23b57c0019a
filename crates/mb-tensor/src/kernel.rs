//! The dot-product kernel shared by every backend.

use crate::error::{MatrixError, Result};

/// C[row][col] for row-major `a` ([m, k]) and `b` ([k, n]).
///
/// Accumulates t = 0..k in order, so every backend produces bit-identical
/// results for the same element.
#[inline]
pub fn dot(a: &[f64], b: &[f64], row: usize, col: usize, k: usize, n: usize) -> f64 {
    let a_row = &a[row * k..(row + 1) * k];
    let mut sum = 0.0f64;
    for (t, &x) in a_row.iter().enumerate() {
        sum += x * b[t * n + col];
    }
    sum
}

/// Fill one output row `out` (length n) with row `row` of A @ B.
#[inline]
pub fn fill_row(a: &[f64], b: &[f64], row: usize, k: usize, n: usize, out: &mut [f64]) {
    for (col, c) in out.iter_mut().enumerate() {
        *c = dot(a, b, row, col, k, n);
    }
}

/// Validate that the operand slices match the declared dimensions.
pub fn check_operands(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<()> {
    if a.len() != m * k {
        return Err(MatrixError::DataLength {
            expected: m * k,
            got: a.len(),
        });
    }
    if b.len() != k * n {
        return Err(MatrixError::DataLength {
            expected: k * n,
            got: b.len(),
        });
    }
    Ok(())
}
