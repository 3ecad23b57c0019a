//! `mb-cli` - Benchmark driver behind the `matbench` binary.
//!
//! Wires the generator, the multiplication backends, and the file codec
//! together, times the multiplication, and reports to a console sink.

pub mod config;
pub mod error;
pub mod report;
pub mod run;

pub use config::{BenchConfig, ReadConfig};
pub use error::{BenchError, Result};
pub use report::{timed_matmul, MatmulReport};
pub use run::{run_bench, run_read, BenchOutcome};
