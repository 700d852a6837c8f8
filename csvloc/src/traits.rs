//! Traits for reading and writing csvloc documents from/to any source.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Cursor, Write},
    path::Path,
};

use crate::error::Error;

/// A trait for parsing and writing one document (a schema, a group sheet, ...).
///
/// # Example
///
/// ```rust,no_run
/// use csvloc::{KeySpaceConfig, traits::Parser};
/// let config = KeySpaceConfig::read_from("schema.json")?;
/// config.write_to("schema_copy.json")?;
/// Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Parser {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error>
    where
        Self: Sized;

    /// Parse from file path.
    ///
    /// A byte-order mark selects the encoding (UTF-8, UTF-16LE/BE); without
    /// one the content is read as UTF-8.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let file = File::open(path)?;
        let decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(file);
        Self::from_reader(BufReader::new(decoder))
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, writer: W) -> Result<(), Error>;

    /// Write to file path.
    fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.to_writer(writer)
    }

    /// Parse from a string.
    fn from_str(s: &str) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(s))
    }

    /// Parse from bytes.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        Self::from_reader(Cursor::new(bytes))
    }
}
