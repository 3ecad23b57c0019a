use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("cannot open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("truncated input: expected {expected} values, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("invalid numeric token '{token}' at position {index}")]
    InvalidToken { token: String, index: usize },
    #[error("jagged row at line {line}: expected {expected} values, got {got}")]
    JaggedRow {
        line: usize,
        expected: usize,
        got: usize,
    },
    #[error("input contains no rows")]
    Empty,
    #[error("unknown text layout '{0}' (expected fixed or tab)")]
    UnknownLayout(String),
    #[error("matrix error: {0}")]
    Matrix(#[from] mb_tensor::MatrixError),
}

pub type Result<T> = std::result::Result<T, CodecError>;
