use thiserror::Error;

use mb_tensor::Shape;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Matrix(#[from] mb_tensor::MatrixError),
    #[error(transparent)]
    Generator(#[from] mb_gen::GenError),
    #[error(transparent)]
    Codec(#[from] mb_io::CodecError),
    #[error("verification failed: reference is {reference}, product is {product}")]
    VerifyShape { reference: Shape, product: Shape },
    #[error("verification failed: max |diff| = {max_diff} exceeds tolerance {tolerance}")]
    VerifyMismatch { max_diff: f64, tolerance: f64 },
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
