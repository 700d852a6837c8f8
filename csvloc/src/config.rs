//! The immutable key-space schema: ordered groups and supported languages.
//!
//! Flat keys are assigned contiguously group by group in declared order, so the
//! Nth group owns `first_key(n)..first_key(n) + size`.

use std::{
    collections::HashSet,
    io::{BufRead, Write},
    ops::Range,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser};

/// A named, fixed-size partition of the key space.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    pub name: String,
    pub size: usize,
}

impl Group {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// The generator-facing shape of a key space, as stored in `schema.json`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct KeySpaceSchema {
    pub languages: Vec<String>,
    pub groups: Vec<Group>,
}

/// Immutable schema with precomputed flat-key offsets.
///
/// # Example
///
/// ```rust
/// use csvloc::{Group, KeySpaceConfig};
///
/// let config = KeySpaceConfig::new(
///     vec!["English".to_string(), "Polish".to_string()],
///     vec![Group::new("Common", 2), Group::new("Shop", 1)],
/// )?;
/// assert_eq!(config.total_keys(), 3);
/// assert_eq!(config.locate(2), Some((1, 0)));
/// assert_eq!(config.file_column_index("Polish"), 2);
/// # Ok::<(), csvloc::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "KeySpaceSchema", into = "KeySpaceSchema")]
pub struct KeySpaceConfig {
    languages: Vec<String>,
    groups: Vec<Group>,
    first_keys: Vec<usize>,
    total_keys: usize,
}

impl KeySpaceConfig {
    /// Builds a config, rejecting duplicate languages, duplicate group names and
    /// zero-sized groups.
    pub fn new(languages: Vec<String>, groups: Vec<Group>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for language in &languages {
            if !seen.insert(language.as_str()) {
                return Err(Error::schema(format!("duplicate language `{language}`")));
            }
        }

        let mut seen = HashSet::new();
        let mut first_keys = Vec::with_capacity(groups.len());
        let mut total_keys = 0;
        for group in &groups {
            if !seen.insert(group.name.as_str()) {
                return Err(Error::schema(format!("duplicate group `{}`", group.name)));
            }
            if group.size == 0 {
                return Err(Error::schema(format!("group `{}` has no keys", group.name)));
            }
            first_keys.push(total_keys);
            total_keys += group.size;
        }

        Ok(Self {
            languages,
            groups,
            first_keys,
            total_keys,
        })
    }

    pub fn total_keys(&self) -> usize {
        self.total_keys
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&Group> {
        self.groups.get(index)
    }

    pub fn group_size(&self, index: usize) -> Option<usize> {
        self.group(index).map(|g| g.size)
    }

    pub fn group_name(&self, index: usize) -> Option<&str> {
        self.group(index).map(|g| g.name.as_str())
    }

    pub fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    /// The flat key of the first entry of a group.
    pub fn first_key(&self, index: usize) -> Option<usize> {
        self.first_keys.get(index).copied()
    }

    /// All flat keys owned by a group.
    pub fn key_range(&self, index: usize) -> Option<Range<usize>> {
        let first = self.first_key(index)?;
        let size = self.group_size(index)?;
        Some(first..first + size)
    }

    /// Resolves a flat key to `(group index, offset within group)` by walking the
    /// groups in declared order.
    pub fn locate(&self, key: usize) -> Option<(usize, usize)> {
        let mut offset = key;
        for (index, group) in self.groups.iter().enumerate() {
            if offset < group.size {
                return Some((index, offset));
            }
            offset -= group.size;
        }
        None
    }

    /// The flat key of `offset` within group `group`.
    pub fn flat_key(&self, group: usize, offset: usize) -> Option<usize> {
        let size = self.group_size(group)?;
        (offset < size).then(|| self.first_keys[group] + offset)
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn language_count(&self) -> usize {
        self.languages.len()
    }

    pub fn language(&self, index: usize) -> Option<&str> {
        self.languages.get(index).map(String::as_str)
    }

    pub fn is_language_supported(&self, name: &str) -> bool {
        self.language_index(name).is_some()
    }

    pub fn language_index(&self, name: &str) -> Option<usize> {
        self.languages.iter().position(|l| l == name)
    }

    /// The blob column holding `language`: one past its position in the
    /// supported list, or `0` (the key column) when unsupported.
    pub fn file_column_index(&self, language: &str) -> usize {
        self.language_index(language).map_or(0, |index| index + 1)
    }

    /// The generator-facing shape of this config.
    pub fn to_schema(&self) -> KeySpaceSchema {
        KeySpaceSchema::from(self.clone())
    }
}

impl TryFrom<KeySpaceSchema> for KeySpaceConfig {
    type Error = Error;

    fn try_from(schema: KeySpaceSchema) -> Result<Self, Self::Error> {
        KeySpaceConfig::new(schema.languages, schema.groups)
    }
}

impl From<KeySpaceConfig> for KeySpaceSchema {
    fn from(config: KeySpaceConfig) -> Self {
        KeySpaceSchema {
            languages: config.languages,
            groups: config.groups,
        }
    }
}

impl Parser for KeySpaceConfig {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let schema: KeySpaceSchema = serde_json::from_reader(reader)?;
        KeySpaceConfig::try_from(schema)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, &self.to_schema())?;
        writer.flush()?;
        Ok(())
    }
}
