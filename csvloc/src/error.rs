//! All error types for the csvloc crate.
//!
//! Variants fall into four families: format errors from the CSV codec,
//! schema errors from configuration and sheet validation, range errors from
//! flat-key and language lookups, and load errors recorded on a failed
//! [`crate::LoadRequest`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CSV format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("key {key} is out of range (total keys: {total})")]
    KeyOutOfRange { key: usize, total: usize },

    #[error("key {key} belongs to group {group}, which is not loaded")]
    GroupNotLoaded { group: usize, key: usize },

    #[error("language index {index} is out of range (languages: {count})")]
    LanguageOutOfRange { index: usize, count: usize },

    #[error("group index {group} is out of range (groups: {count})")]
    GroupOutOfRange { group: usize, count: usize },

    #[error("unsupported language `{0}`")]
    UnsupportedLanguage(String),

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("request of generation {request} was superseded by generation {current}")]
    StaleRequest { request: u64, current: u64 },

    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("a CSV row must contain at least one cell")]
    EmptyRow,

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new format error for the given physical line.
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        Error::Format {
            line,
            message: message.into(),
        }
    }

    /// Creates a new schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Error::Schema(message.into())
    }

    /// Whether this is a bounds violation on a key, group or language index.
    pub fn is_range_error(&self) -> bool {
        matches!(
            self,
            Error::KeyOutOfRange { .. }
                | Error::GroupNotLoaded { .. }
                | Error::LanguageOutOfRange { .. }
                | Error::GroupOutOfRange { .. }
        )
    }

    /// Whether this error can end a load request without being fatal to the process.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedLanguage(_)
                | Error::InvalidSelection(_)
                | Error::StaleRequest { .. }
                | Error::Fetch(_)
                | Error::LanguageOutOfRange { .. }
                | Error::GroupOutOfRange { .. }
        )
    }
}
