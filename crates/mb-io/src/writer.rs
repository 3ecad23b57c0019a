use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;

use mb_tensor::Matrix;

use crate::error::{CodecError, Result};
use crate::layout::TextLayout;

/// Write `matrix` to `out`, one row per line.
pub fn write_to<W: Write>(matrix: &Matrix, out: &mut W, layout: TextLayout) -> Result<()> {
    for row in matrix.iter_rows() {
        layout.write_row(out, row)?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

/// Create (or truncate) the file at `path` and write `matrix` to it.
///
/// # Errors
/// `Open` if the file cannot be created; `Io` if a write or the final flush
/// fails. The file handle is closed on every path.
pub fn write_matrix(matrix: &Matrix, path: &Path, layout: TextLayout) -> Result<()> {
    let file = File::create(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("OK: writing {} matrix to {}", matrix.shape(), path.display());

    let mut out = BufWriter::new(file);
    write_to(matrix, &mut out, layout)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_tensor::Shape;

    #[test]
    fn test_write_to_buffer() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.5]]).unwrap();
        let mut buf = Vec::new();
        write_to(&m, &mut buf, TextLayout::Tab).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1\t2\n3\t4.5\n");
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.txt");
        let m = Matrix::zeros(Shape::new(2, 3).unwrap());
        write_matrix(&m, &path, TextLayout::FixedWidth(3)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "  0  0  0\n  0  0  0\n");
    }

    #[test]
    fn test_write_unopenable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("m.txt");
        let m = Matrix::identity(2).unwrap();
        assert!(matches!(
            write_matrix(&m, &path, TextLayout::default()),
            Err(CodecError::Open { .. })
        ));
        assert!(!path.exists());
    }
}
