use crate::error::{MatrixError, Result};
use std::fmt;

/// The (rows, columns) pair that accompanies every matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a new shape.
    ///
    /// # Errors
    /// Returns `InvalidDimensions` if either dimension is zero, `TooLarge` if
    /// `rows * cols` f64 elements cannot be addressed in memory.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(MatrixError::InvalidDimensions { rows, cols });
        }
        let max_elements = isize::MAX as usize / std::mem::size_of::<f64>();
        match rows.checked_mul(cols) {
            Some(n) if n <= max_elements => Ok(Shape { rows, cols }),
            _ => Err(MatrixError::TooLarge { rows, cols }),
        }
    }

    /// Shape of a square `n`x`n` matrix.
    pub fn square(n: usize) -> Result<Self> {
        Shape::new(n, n)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements (rows * cols).
    pub fn numel(&self) -> usize {
        self.rows * self.cols
    }

    /// Row-major flat index of element (i, j).
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.cols + j
    }

    /// Returns true if `self` can be multiplied on the right by `other`.
    pub fn is_conformable(&self, other: &Shape) -> bool {
        self.cols == other.rows
    }

    /// Shape of `self @ other`.
    ///
    /// (n, m) @ (m, k) = (n, k)
    pub fn product(&self, other: &Shape) -> Result<Shape> {
        if !self.is_conformable(other) {
            return Err(MatrixError::ShapeMismatch {
                left: *self,
                right: *other,
            });
        }
        Shape::new(self.rows, other.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}x{}]", self.rows, self.cols)
    }
}
