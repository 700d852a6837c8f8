//! CSV writer accumulating rows into an in-memory buffer.

use std::{
    fmt::{Display, Formatter},
    io::Write,
};

use super::{DELIMITER, QUOTE, TERMINATOR};
use crate::error::Error;

/// Accumulates rows and renders them as CSV text.
///
/// # Example
///
/// ```rust
/// use csvloc::csv::Writer;
///
/// let mut writer = Writer::new();
/// writer.add_row(&["K1", "Hello, world"])?;
/// writer.add_row(&["K2", "Say \"hi\""])?;
/// assert_eq!(writer.render(), "K1,\"Hello, world\"\nK2,\"Say \"\"hi\"\"\"");
/// # Ok::<(), csvloc::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Writer {
    buffer: String,
    rows: usize,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one row. Fails with [`Error::EmptyRow`] if `row` has no cells.
    ///
    /// A row made of a single empty cell is written as `""`, so it still reads
    /// back as one row after [`Writer::render`] drops the final terminator.
    pub fn add_row<S: AsRef<str>>(&mut self, row: &[S]) -> Result<(), Error> {
        let (last, init) = row.split_last().ok_or(Error::EmptyRow)?;

        if init.is_empty() && last.as_ref().is_empty() {
            // A bare empty line would vanish once the trailing terminator is stripped.
            self.buffer.push(QUOTE);
            self.buffer.push(QUOTE);
        } else {
            for cell in init {
                push_cell(&mut self.buffer, cell.as_ref());
                self.buffer.push(DELIMITER);
            }
            push_cell(&mut self.buffer, last.as_ref());
        }
        self.buffer.push(TERMINATOR);
        self.rows += 1;
        Ok(())
    }

    /// Number of rows added since creation or the last [`Writer::clear`].
    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// The accumulated rows without the final line terminator.
    pub fn render(&self) -> &str {
        self.buffer
            .strip_suffix(TERMINATOR)
            .unwrap_or(&self.buffer)
    }

    /// Writes the rendered rows to any writer.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Discards all accumulated rows.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.rows = 0;
    }
}

impl Display for Writer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.render())
    }
}

/// Whether a cell must be wrapped in quotes to survive a round trip.
///
/// `\r` counts because an unquoted `\r` before a line break would be read as
/// part of a `\r\n` terminator.
pub fn needs_quotes(cell: &str) -> bool {
    cell.contains(|c| matches!(c, DELIMITER | QUOTE | TERMINATOR | '\r'))
}

fn push_cell(buffer: &mut String, cell: &str) {
    if !needs_quotes(cell) {
        buffer.push_str(cell);
        return;
    }

    buffer.push(QUOTE);
    for c in cell.chars() {
        if c == QUOTE {
            buffer.push(QUOTE);
        }
        buffer.push(c);
    }
    buffer.push(QUOTE);
}
