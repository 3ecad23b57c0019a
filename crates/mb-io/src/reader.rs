use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use mb_tensor::{Matrix, Shape};

use crate::error::{CodecError, Result};

fn parse_token(token: &str, index: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| CodecError::InvalidToken {
        token: token.to_string(),
        index,
    })
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("OK: reading {}", path.display());
    Ok(BufReader::new(file))
}

/// Fill a `rows` x `cols` matrix from whitespace-delimited tokens in
/// row-major order. Line breaks carry no meaning; reading stops once
/// `rows * cols` values have been taken.
///
/// # Errors
/// `Truncated` if the input ends early, `InvalidToken` for a token that is
/// not a number.
pub fn read_from<R: BufRead>(reader: R, rows: usize, cols: usize) -> Result<Matrix> {
    let mut matrix = Matrix::zeros(Shape::new(rows, cols)?);
    let expected = matrix.data().len();
    let mut found = 0;

    let data = matrix.data_mut();
    'lines: for line in reader.lines() {
        let line = line?;
        for token in line.split_whitespace() {
            if found == expected {
                break 'lines;
            }
            data[found] = parse_token(token, found)?;
            found += 1;
        }
        if found == expected {
            break;
        }
    }

    if found < expected {
        return Err(CodecError::Truncated { expected, found });
    }
    Ok(matrix)
}

/// Read a matrix with known dimensions from the file at `path`.
pub fn read_matrix(rows: usize, cols: usize, path: &Path) -> Result<Matrix> {
    read_from(open(path)?, rows, cols)
}

/// Read a matrix whose shape follows the line structure: one row per
/// non-blank line.
///
/// # Errors
/// `Empty` if there are no rows, `JaggedRow` if a line has a different number
/// of values than the first.
pub fn read_inferred_from<R: BufRead>(reader: R) -> Result<Matrix> {
    let mut data = Vec::new();
    let mut cols = 0;
    let mut rows = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let start = data.len();
        for token in line.split_whitespace() {
            let index = data.len();
            data.push(parse_token(token, index)?);
        }
        let got = data.len() - start;
        if got == 0 {
            continue;
        }
        if rows == 0 {
            cols = got;
        } else if got != cols {
            return Err(CodecError::JaggedRow {
                line: line_no + 1,
                expected: cols,
                got,
            });
        }
        rows += 1;
    }

    if rows == 0 {
        return Err(CodecError::Empty);
    }
    debug!("inferred shape {}x{}", rows, cols);
    Ok(Matrix::new(data, Shape::new(rows, cols)?)?)
}

/// Read a matrix from the file at `path`, inferring its shape.
pub fn read_matrix_inferred(path: &Path) -> Result<Matrix> {
    read_inferred_from(open(path)?)
}
