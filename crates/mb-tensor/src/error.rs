use thiserror::Error;

use crate::shape::Shape;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("shape mismatch: cannot multiply {left} by {right}")]
    ShapeMismatch { left: Shape, right: Shape },
    #[error("invalid matrix dimensions {rows}x{cols}: both must be > 0")]
    InvalidDimensions { rows: usize, cols: usize },
    #[error("matrix {rows}x{cols} is too large to address")]
    TooLarge { rows: usize, cols: usize },
    #[error("data length mismatch: expected {expected} elements, got {got}")]
    DataLength { expected: usize, got: usize },
    #[error("jagged rows: row {row} has {got} elements, expected {expected}")]
    JaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("invalid tile configuration: output {rows}x{cols} is not a multiple of tile {tile}")]
    InvalidTileConfiguration {
        rows: usize,
        cols: usize,
        tile: usize,
    },
    #[error("unknown execution strategy '{0}' (expected sequential, threads, or device)")]
    UnknownStrategy(String),
    #[error("thread count must be > 0")]
    InvalidThreadCount,
    #[error("thread pool error: {0}")]
    ThreadPool(String),
    #[error("device error: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;
