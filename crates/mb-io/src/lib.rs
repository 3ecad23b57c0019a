//! `mb-io` - Plain-text matrix files for matbench.
//!
//! One matrix row per line, whitespace-separated decimal values, no header.
//! Dimensions are not stored in the file: readers either pass them in or let
//! them be inferred from the line structure.

pub mod error;
pub mod layout;
pub mod reader;
pub mod writer;

pub use error::{CodecError, Result};
pub use layout::TextLayout;
pub use reader::{read_from, read_inferred_from, read_matrix, read_matrix_inferred};
pub use writer::{write_matrix, write_to};
