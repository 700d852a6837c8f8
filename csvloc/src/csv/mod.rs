//! The CSV dialect used by localization blobs and group sheets.
//!
//! Comma-delimited, double-quote escaped, LF-terminated records. Rows may have
//! different widths; deciding whether that is an error is left to callers.

mod reader;
mod writer;

pub use reader::{Reader, Rows};
pub use writer::{Writer, needs_quotes};

pub(crate) const DELIMITER: char = ',';
pub(crate) const QUOTE: char = '"';
pub(crate) const TERMINATOR: char = '\n';
