//! `mb-tensor` - Dense matrices with pluggable multiplication backends for matbench.
//!
//! This crate provides:
//! - A row-major `Matrix` type with its `Shape`
//! - A `MatmulBackend` trait for pluggable execution (sequential, thread pool, device grid)
//! - The shared dot-product kernel every backend accumulates with
//! - `ExecutionStrategy`, which selects a backend from configuration

pub mod backend;
pub mod cpu;
pub mod device;
pub mod error;
pub mod kernel;
pub mod matrix;
pub mod shape;
pub mod strategy;

// Re-export primary types at the crate root for convenience.
pub use backend::MatmulBackend;
pub use cpu::{SequentialBackend, ThreadPoolBackend};
pub use device::{GridBackend, LaunchConfig};
pub use error::{MatrixError, Result};
pub use matrix::Matrix;
pub use shape::Shape;
pub use strategy::ExecutionStrategy;
