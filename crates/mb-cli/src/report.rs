use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};

use log::debug;

use mb_tensor::{Matrix, MatmulBackend, Shape};

use crate::error::Result;

/// Shapes, backend, and wall-clock time of one multiplication.
#[derive(Debug, Clone)]
pub struct MatmulReport {
    pub left: Shape,
    pub right: Shape,
    pub result: Shape,
    pub backend: String,
    pub elapsed: Duration,
}

impl fmt::Display for MatmulReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "A: {}", self.left)?;
        writeln!(f, "B: {}", self.right)?;
        writeln!(f, "C: {}", self.result)?;
        writeln!(f, "backend: {}", self.backend)?;
        write!(
            f,
            "time spent: {:.2} milliseconds",
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}

/// Multiply `a` by `b` on `backend`, timing only the multiplication.
pub fn timed_matmul(
    a: &Matrix,
    b: &Matrix,
    backend: &dyn MatmulBackend,
) -> Result<(Matrix, MatmulReport)> {
    let start = Instant::now();
    let c = a.matmul(b, backend)?;
    let elapsed = start.elapsed();
    debug!("{} matmul finished in {:?}", backend.name(), elapsed);

    let report = MatmulReport {
        left: a.shape(),
        right: b.shape(),
        result: c.shape(),
        backend: backend.name().to_string(),
        elapsed,
    };
    Ok((c, report))
}

/// Print `matrix` under `label` if both of its dimensions are within
/// `limit`. Returns whether it was printed.
pub fn print_if_small<W: Write>(
    out: &mut W,
    label: &str,
    matrix: &Matrix,
    limit: usize,
) -> std::io::Result<bool> {
    if matrix.rows() > limit || matrix.cols() > limit {
        return Ok(false);
    }
    writeln!(out, "{} =", label)?;
    write!(out, "{}", matrix)?;
    Ok(true)
}
