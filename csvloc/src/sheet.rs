//! Upstream per-group sheets: a header row naming the key column and the
//! language columns, then one row per key.

use std::{collections::HashSet, fs::File, io::Read, path::Path};

use crate::{csv::Reader, error::Error, schema::is_valid_name};

/// One group's keys and translations, columns reordered to `[key, languages...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl GroupSheet {
    /// Parses a sheet exported for group `name`.
    ///
    /// The header must contain a column for every language in `languages`; other
    /// columns are ignored. Reading stops at the end of input or at the first row
    /// with a blank key. Keys must be valid names and unique within the sheet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use csvloc::GroupSheet;
    ///
    /// let text = "Key,Polish,Notes,English\nGreeting,Cześć,informal,Hello\n";
    /// let sheet = GroupSheet::parse("Common", text, &["English", "Polish"])?;
    /// assert_eq!(sheet.rows, vec![vec!["Greeting", "Hello", "Cześć"]]);
    /// # Ok::<(), csvloc::Error>(())
    /// ```
    pub fn parse<S: AsRef<str>>(name: &str, text: &str, languages: &[S]) -> Result<Self, Error> {
        let text = text.replace("\r\n", "\n");
        let mut reader = Reader::from_text(&text);

        let mut header = Vec::new();
        if reader.read_row(&mut header)? == 0 {
            return Err(Error::schema(format!("the sheet of group `{name}` is empty")));
        }
        let columns = languages
            .iter()
            .map(|language| {
                let language = language.as_ref();
                header.iter().position(|h| h == language).ok_or_else(|| {
                    Error::schema(format!(
                        "there is no `{language}` column in the group `{name}`"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::new();
        let mut keys = HashSet::new();
        for row in reader.rows() {
            let mut row = row?;
            let key = row.first().map(String::as_str).unwrap_or_default();
            if key.trim().is_empty() {
                break;
            }

            let index = rows.len();
            if !is_valid_name(key) {
                return Err(Error::schema(format!(
                    "the key `{key}` ({index}) in the group `{name}` is not valid; it must start with a capital letter and contain only [a-z, A-Z, 0-9, '_']"
                )));
            }
            if !keys.insert(key.to_string()) {
                return Err(Error::schema(format!(
                    "the key `{key}` in the group `{name}` is not unique"
                )));
            }

            let mut reordered = Vec::with_capacity(columns.len() + 1);
            reordered.push(std::mem::take(&mut row[0]));
            for (&column, language) in columns.iter().zip(languages) {
                let cell = row.get_mut(column).ok_or_else(|| {
                    Error::schema(format!(
                        "the key `{}` in the group `{name}` has no `{}` cell",
                        reordered[0],
                        language.as_ref()
                    ))
                })?;
                reordered.push(std::mem::take(cell));
            }
            rows.push(reordered);
        }

        if rows.is_empty() {
            return Err(Error::schema(format!("the group `{name}` has no keys")));
        }

        Ok(GroupSheet {
            name: name.to_string(),
            rows,
        })
    }

    /// Reads and parses a sheet file, decoding it according to its byte-order mark.
    pub fn read_from<S, P>(name: &str, path: P, languages: &[S]) -> Result<Self, Error>
    where
        S: AsRef<str>,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(file);
        let mut text = String::new();
        decoder.read_to_string(&mut text)?;
        Self::parse(name, &text, languages)
    }

    pub fn key_count(&self) -> usize {
        self.rows.len()
    }

    /// Key column of every row. A row without cells yields an empty key.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(|row| row.first().map(String::as_str).unwrap_or_default())
    }
}
