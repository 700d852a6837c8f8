//! Streaming CSV reader.
//!
//! The reader pulls one physical line at a time from a [`BufRead`] source and
//! only pulls more while it is inside a quoted cell, so memory use is bounded
//! by the current logical row. Lines end with `\n` or `\r\n`; inside a quoted
//! cell the line break is kept exactly as it appears in the source.

use std::io::BufRead;

use super::{DELIMITER, QUOTE};
use crate::error::Error;

/// Reads rows of text cells from a streaming source.
#[derive(Debug)]
pub struct Reader<R> {
    source: R,
    line: String,
    /// Line break stripped from the end of `line`.
    line_break: &'static str,
    line_number: usize,
}

/// A cell exactly as it appears in the source, before unescaping.
struct RawCell<'a> {
    text: &'a str,
    quoted: bool,
}

impl RawCell<'_> {
    fn decode(&self) -> String {
        if self.quoted {
            self.text.replace("\"\"", "\"")
        } else {
            self.text.to_string()
        }
    }
}

impl<'a> Reader<&'a [u8]> {
    /// Creates a reader over in-memory text.
    pub fn from_text(text: &'a str) -> Self {
        Reader::new(text.as_bytes())
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            line: String::new(),
            line_break: "",
            line_number: 0,
        }
    }

    /// Number of physical lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns `true` once the source has nothing left to read.
    pub fn is_exhausted(&mut self) -> Result<bool, Error> {
        Ok(self.source.fill_buf()?.is_empty())
    }

    /// Appends every cell of the next row to `row` and returns how many were appended.
    ///
    /// `row` is not cleared first. Returns `0` when the source is exhausted.
    pub fn read_row(&mut self, row: &mut Vec<String>) -> Result<usize, Error> {
        self.walk_row(|_, cell| row.push(cell.decode()))
    }

    /// Consumes the next row and returns only the cell at `column`.
    ///
    /// Returns `None` if the row is shorter than `column + 1` cells or the source
    /// is exhausted. Other cells are scanned but never allocated.
    pub fn read_column(&mut self, column: usize) -> Result<Option<String>, Error> {
        let mut value = None;
        self.walk_row(|index, cell| {
            if index == column {
                value = Some(cell.decode());
            }
        })?;
        Ok(value)
    }

    /// Consumes the next row without decoding any cell.
    ///
    /// Returns `false` when the source was already exhausted.
    pub fn skip_row(&mut self) -> Result<bool, Error> {
        Ok(self.walk_row(|_, _| {})? > 0)
    }

    /// Iterates over the remaining rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows { reader: self }
    }

    fn walk_row<F>(&mut self, mut visit: F) -> Result<usize, Error>
    where
        F: FnMut(usize, RawCell<'_>),
    {
        if !self.next_line()? {
            return Ok(0);
        }

        let mut column = 0;
        let mut start = 0;
        loop {
            let rest = &self.line[start..];
            if !rest.starts_with(QUOTE) {
                match rest.find(DELIMITER) {
                    Some(end) => {
                        visit(
                            column,
                            RawCell {
                                text: &rest[..end],
                                quoted: false,
                            },
                        );
                        column += 1;
                        start += end + 1;
                        continue;
                    }
                    None => {
                        visit(
                            column,
                            RawCell {
                                text: rest,
                                quoted: false,
                            },
                        );
                        return Ok(column + 1);
                    }
                }
            }

            let content = start + 1;
            let mut search = content;
            let close = loop {
                if let Some(close) = find_closing_quote(&self.line, search) {
                    break close;
                }
                search = self.line.len();
                if !self.continue_line()? {
                    return Err(Error::format(self.line_number, "unterminated quoted cell"));
                }
            };

            visit(
                column,
                RawCell {
                    text: &self.line[content..close],
                    quoted: true,
                },
            );
            column += 1;

            let after = close + 1;
            match self.line[after..].chars().next() {
                None => return Ok(column),
                Some(DELIMITER) => start = after + 1,
                Some(other) => {
                    return Err(Error::format(
                        self.line_number,
                        format!("unexpected character {other:?} after closing quote"),
                    ));
                }
            }
        }
    }

    fn next_line(&mut self) -> Result<bool, Error> {
        self.line.clear();
        if self.source.read_line(&mut self.line)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        self.line_break = strip_line_break(&mut self.line);
        Ok(true)
    }

    /// Joins the next physical line onto the current one, keeping the line break.
    fn continue_line(&mut self) -> Result<bool, Error> {
        let joined = self.line.len();
        self.line.push_str(self.line_break);
        if self.source.read_line(&mut self.line)? == 0 {
            self.line.truncate(joined);
            return Ok(false);
        }
        self.line_number += 1;
        self.line_break = strip_line_break(&mut self.line);
        Ok(true)
    }
}

/// Iterator over the remaining rows of a [`Reader`].
#[derive(Debug)]
pub struct Rows<'r, R> {
    reader: &'r mut Reader<R>,
}

impl<R: BufRead> Iterator for Rows<'_, R> {
    type Item = Result<Vec<String>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut row = Vec::new();
        match self.reader.read_row(&mut row) {
            Ok(0) => None,
            Ok(_) => Some(Ok(row)),
            Err(e) => Some(Err(e)),
        }
    }
}

/// Removes a trailing `\n` or `\r\n` and returns what was removed.
fn strip_line_break(line: &mut String) -> &'static str {
    if line.ends_with("\r\n") {
        line.truncate(line.len() - 2);
        "\r\n"
    } else if line.ends_with('\n') {
        line.pop();
        "\n"
    } else {
        ""
    }
}

/// Finds the quote that closes a quoted cell whose content starts at `from`.
///
/// The closing quote is the last quote of the first run of odd length; even
/// runs are escaped quotes belonging to the content.
fn find_closing_quote(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut index = from;
    while index < bytes.len() {
        if bytes[index] == QUOTE as u8 {
            let run = bytes[index..]
                .iter()
                .take_while(|&&b| b == QUOTE as u8)
                .count();
            if run % 2 == 1 {
                return Some(index + run - 1);
            }
            index += run;
        } else {
            index += 1;
        }
    }
    None
}
