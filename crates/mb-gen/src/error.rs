use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenError {
    #[error("invalid value range: low {low} > high {high}")]
    InvalidRange { low: i64, high: i64 },
    #[error("unknown value distribution '{0}' (expected int or unit)")]
    UnknownDistribution(String),
    #[error("matrix error: {0}")]
    Matrix(#[from] mb_tensor::MatrixError),
}

pub type Result<T> = std::result::Result<T, GenError>;
