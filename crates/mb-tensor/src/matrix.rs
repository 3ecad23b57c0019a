use std::fmt;

use crate::backend::MatmulBackend;
use crate::error::{MatrixError, Result};
use crate::shape::Shape;

/// A dense, rectangular matrix of f64 values.
///
/// Stored contiguously in row-major order, so every row has exactly
/// `shape.cols()` elements by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    shape: Shape,
}

impl Matrix {
    /// Create a matrix from row-major data and a shape.
    ///
    /// # Errors
    /// `DataLength` if `data.len() != shape.numel()`.
    pub fn new(data: Vec<f64>, shape: Shape) -> Result<Self> {
        if data.len() != shape.numel() {
            return Err(MatrixError::DataLength {
                expected: shape.numel(),
                got: data.len(),
            });
        }
        Ok(Matrix { data, shape })
    }

    /// Create a zero-filled matrix with the given shape.
    pub fn zeros(shape: Shape) -> Self {
        Matrix {
            data: vec![0.0; shape.numel()],
            shape,
        }
    }

    /// The `n`x`n` identity matrix.
    pub fn identity(n: usize) -> Result<Self> {
        let mut m = Matrix::zeros(Shape::square(n)?);
        for i in 0..n {
            m.set(i, i, 1.0);
        }
        Ok(m)
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    /// `InvalidDimensions` for an empty input or empty first row,
    /// `JaggedRows` if any row length differs from the first.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let shape = Shape::new(rows.len(), cols)?;
        let mut data = Vec::with_capacity(shape.numel());
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixError::JaggedRows {
                    row: i,
                    expected: cols,
                    got: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Matrix { data, shape })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows()
    }

    pub fn cols(&self) -> usize {
        self.shape.cols()
    }

    /// Element (i, j).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.rows() && j < self.cols(),
            "index ({}, {}) out of bounds for {}",
            i,
            j,
            self.shape
        );
        self.data[self.shape.index(i, j)]
    }

    /// Overwrite element (i, j).
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(
            i < self.rows() && j < self.cols(),
            "index ({}, {}) out of bounds for {}",
            i,
            j,
            self.shape
        );
        let idx = self.shape.index(i, j);
        self.data[idx] = value;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        let cols = self.cols();
        &self.data[i * cols..(i + 1) * cols]
    }

    /// Iterator over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols())
    }

    /// Row-major element data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major element data. The shape cannot change through it.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Matrix product `self @ other` computed by `backend`.
    ///
    /// self is [m, k], other is [k, n], result is [m, n].
    ///
    /// # Errors
    /// `ShapeMismatch` if `self.cols() != other.rows()`; checked before the
    /// backend is invoked.
    pub fn matmul(&self, other: &Matrix, backend: &dyn MatmulBackend) -> Result<Matrix> {
        let out = self.shape.product(&other.shape)?;
        let data = backend.matmul(
            &self.data,
            &other.data,
            self.rows(),
            self.cols(),
            other.cols(),
        )?;
        Matrix::new(data, out)
    }

    /// Largest absolute element-wise difference, or `None` if the shapes
    /// differ.
    pub fn max_abs_diff(&self, other: &Matrix) -> Option<f64> {
        if self.shape != other.shape {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max),
        )
    }

    /// True if the shapes match and every element differs by at most
    /// `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.max_abs_diff(other).is_some_and(|d| d <= tolerance)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for (j, v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{SequentialBackend, ThreadPoolBackend};
    use crate::device::GridBackend;
    use approx::assert_relative_eq;

    fn shape(r: usize, c: usize) -> Shape {
        Shape::new(r, c).unwrap()
    }

    /// Deterministic, non-trivial test data.
    fn filled(r: usize, c: usize, salt: usize) -> Matrix {
        let data = (0..r * c)
            .map(|v| ((v * 7 + salt) % 13) as f64 - 6.0 + 0.125 * (v % 3) as f64)
            .collect();
        Matrix::new(data, shape(r, c)).unwrap()
    }

    #[test]
    fn test_new_matrix() {
        let m = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], shape(2, 3)).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_new_length_mismatch() {
        assert!(matches!(
            Matrix::new(vec![1.0, 2.0], shape(3, 1)),
            Err(MatrixError::DataLength { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_from_rows() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.data(), &[1.0, 2.0, 3.0, 4.0]);

        assert!(matches!(
            Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]),
            Err(MatrixError::JaggedRows { row: 1, expected: 2, got: 1 })
        ));
        assert!(Matrix::from_rows(vec![]).is_err());
    }

    #[test]
    fn test_identity() {
        let i = Matrix::identity(3).unwrap();
        assert_eq!(i.get(0, 0), 1.0);
        assert_eq!(i.get(0, 1), 0.0);
        assert_eq!(i.get(2, 2), 1.0);
    }

    #[test]
    fn test_matmul() {
        let backend = SequentialBackend::new();
        let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();
        let c = a.matmul(&b, &backend).unwrap();
        assert_eq!(c.shape(), shape(2, 2));
        assert_eq!(c.data(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matmul_shape_mismatch() {
        let backend = SequentialBackend::new();
        let a = filled(2, 3, 1);
        let b = filled(4, 2, 2);
        match a.matmul(&b, &backend) {
            Err(MatrixError::ShapeMismatch { left, right }) => {
                assert_eq!(left, shape(2, 3));
                assert_eq!(right, shape(4, 2));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }

        let zeros_a = Matrix::zeros(shape(2, 3));
        let zeros_b = Matrix::zeros(shape(4, 2));
        assert!(zeros_a.matmul(&zeros_b, &backend).is_err());
    }

    #[test]
    fn test_matmul_against_reference_dot() {
        let backend = SequentialBackend::new();
        for &(n, m, k) in &[(1, 1, 1), (3, 5, 2), (7, 1, 4), (6, 9, 6)] {
            let a = filled(n, m, 3);
            let b = filled(m, k, 5);
            let c = a.matmul(&b, &backend).unwrap();
            assert_eq!(c.shape(), shape(n, k));
            for i in 0..n {
                for j in 0..k {
                    let expected: f64 = (0..m).map(|t| a.get(i, t) * b.get(t, j)).sum();
                    assert_relative_eq!(c.get(i, j), expected, epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_matmul_identity_is_noop() {
        let backend = SequentialBackend::new();
        let a = filled(4, 6, 2);
        let right = a.matmul(&Matrix::identity(6).unwrap(), &backend).unwrap();
        let left = Matrix::identity(4).unwrap().matmul(&a, &backend).unwrap();
        assert!(right.approx_eq(&a, 0.0));
        assert!(left.approx_eq(&a, 0.0));
    }

    #[test]
    fn test_matmul_zero() {
        let backend = SequentialBackend::new();
        let a = filled(3, 4, 1);
        let c = a.matmul(&Matrix::zeros(shape(4, 5)), &backend).unwrap();
        assert_eq!(c, Matrix::zeros(shape(3, 5)));
    }

    #[test]
    fn test_backends_agree() {
        let a = filled(20, 30, 4);
        let b = filled(30, 10, 9);
        let expected = a.matmul(&b, &SequentialBackend::new()).unwrap();

        let threads = ThreadPoolBackend::new(4).unwrap();
        let grid = GridBackend::new(5).unwrap();
        assert_eq!(a.matmul(&b, &threads).unwrap(), expected);
        assert_eq!(a.matmul(&b, &grid).unwrap(), expected);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![1.5, 1.0]]).unwrap();
        assert_relative_eq!(a.max_abs_diff(&b).unwrap(), 1.0);
        assert!(a.approx_eq(&b, 1.0));
        assert!(!a.approx_eq(&b, 0.5));
        assert!(a.max_abs_diff(&Matrix::zeros(shape(2, 1))).is_none());
    }

    #[test]
    fn test_display() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.5], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.to_string(), "1 2.5\n3 4\n");
    }
}
