use std::io::Write;

use log::{info, warn};

use mb_gen::MatrixGenerator;
use mb_io::{read_matrix, read_matrix_inferred, write_matrix};
use mb_tensor::Matrix;

use crate::config::{BenchConfig, ReadConfig};
use crate::error::{BenchError, Result};
use crate::report::{print_if_small, timed_matmul, MatmulReport};

/// What a benchmark run produced.
#[derive(Debug)]
pub struct BenchOutcome {
    pub report: MatmulReport,
    pub product: Matrix,
    /// Max |diff| against the reference file, when one was given.
    pub max_diff: Option<f64>,
}

/// Generate A and B, multiply them with the configured strategy, and report
/// to `out`.
///
/// Configuration is validated and the backend is built before any matrix is
/// generated.
pub fn run_bench<W: Write>(config: &BenchConfig, out: &mut W) -> Result<BenchOutcome> {
    config.validate()?;
    let backend = config.strategy.backend()?;
    info!(
        "strategy {} -> backend {}, seed {}, values {}",
        config.strategy,
        backend.name(),
        config.seed,
        config.distribution
    );

    let mut generator = MatrixGenerator::new(config.seed, config.distribution)?;
    let a = generator.generate(config.left_rows, config.inner)?;
    let b = generator.generate(config.inner, config.right_cols)?;

    if let Some(path) = &config.write_left {
        write_matrix(&a, path, config.layout)?;
    }
    if let Some(path) = &config.write_right {
        write_matrix(&b, path, config.layout)?;
    }

    let (c, report) = timed_matmul(&a, &b, backend.as_ref())?;

    if let Some(path) = &config.write_result {
        write_matrix(&c, path, config.layout)?;
    }

    print_if_small(out, "A", &a, config.print_limit)?;
    print_if_small(out, "B", &b, config.print_limit)?;
    print_if_small(out, "C", &c, config.print_limit)?;
    writeln!(out, "{}", report)?;

    let max_diff = match &config.verify {
        Some(path) => Some(verify(&c, path, config.tolerance, out)?),
        None => None,
    };

    Ok(BenchOutcome {
        report,
        product: c,
        max_diff,
    })
}

fn verify<W: Write>(
    product: &Matrix,
    path: &std::path::Path,
    tolerance: f64,
    out: &mut W,
) -> Result<f64> {
    let reference = read_matrix_inferred(path)?;
    let max_diff = product
        .max_abs_diff(&reference)
        .ok_or(BenchError::VerifyShape {
            reference: reference.shape(),
            product: product.shape(),
        })?;

    if max_diff > tolerance {
        warn!("product differs from {} by {}", path.display(), max_diff);
        return Err(BenchError::VerifyMismatch {
            max_diff,
            tolerance,
        });
    }
    writeln!(out, "verify: OK (max |diff| = {})", max_diff)?;
    Ok(max_diff)
}

/// Read a matrix file and print its shape and contents to `out`.
pub fn run_read<W: Write>(config: &ReadConfig, out: &mut W) -> Result<Matrix> {
    let matrix = match config.shape {
        Some((rows, cols)) => read_matrix(rows, cols, &config.path)?,
        None => read_matrix_inferred(&config.path)?,
    };
    writeln!(out, "{}: {}", config.path.display(), matrix.shape())?;
    write!(out, "{}", matrix)?;
    Ok(matrix)
}
