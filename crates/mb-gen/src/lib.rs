pub mod distribution;
pub mod error;
pub mod generator;
pub mod seed;

pub use distribution::ValueDistribution;
pub use error::{GenError, Result};
pub use generator::MatrixGenerator;
pub use seed::SeedMode;
