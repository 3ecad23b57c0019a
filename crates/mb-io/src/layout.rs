use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::error::CodecError;

/// Default field width for [`TextLayout::FixedWidth`].
pub const DEFAULT_WIDTH: usize = 10;

/// How the fields of a row are laid out on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    /// Right-aligned in fields of the given width.
    FixedWidth(usize),
    /// Separated by a single tab.
    Tab,
}

impl TextLayout {
    /// Write one row, without the trailing newline.
    ///
    /// Values use the shortest representation that parses back to the same
    /// f64. A fixed-width field that fills its width gets one leading space so
    /// neighbouring fields stay separated.
    pub fn write_row<W: Write>(&self, out: &mut W, row: &[f64]) -> std::io::Result<()> {
        match *self {
            TextLayout::FixedWidth(width) => {
                for v in row {
                    let field = v.to_string();
                    if field.len() >= width {
                        write!(out, " {}", field)?;
                    } else {
                        write!(out, "{:>width$}", field, width = width)?;
                    }
                }
            }
            TextLayout::Tab => {
                for (j, v) in row.iter().enumerate() {
                    if j > 0 {
                        out.write_all(b"\t")?;
                    }
                    write!(out, "{}", v)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        TextLayout::FixedWidth(DEFAULT_WIDTH)
    }
}

impl fmt::Display for TextLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextLayout::FixedWidth(w) => write!(f, "fixed({})", w),
            TextLayout::Tab => write!(f, "tab"),
        }
    }
}

/// Parses `fixed` (default width) or `tab`.
impl FromStr for TextLayout {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fixed" => Ok(TextLayout::default()),
            "tab" => Ok(TextLayout::Tab),
            other => Err(CodecError::UnknownLayout(other.to_string())),
        }
    }
}
