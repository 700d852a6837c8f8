//! Options controlling how a [`crate::Localizator`] loads languages.

/// Name of the blob fetched when no other name is configured.
pub const DEFAULT_BLOB_NAME: &str = "localizations";

/// Load behavior options for [`crate::Localizator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizatorOptions {
    /// Name passed to [`crate::BlobSource::fetch`].
    pub blob_name: String,
    /// Whether every sentinel substitution is logged as a warning.
    pub warn_missing: bool,
}

impl Default for LocalizatorOptions {
    fn default() -> Self {
        Self {
            blob_name: DEFAULT_BLOB_NAME.to_string(),
            warn_missing: true,
        }
    }
}

impl LocalizatorOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the blob name.
    pub fn with_blob_name(mut self, blob_name: impl Into<String>) -> Self {
        self.blob_name = blob_name.into();
        self
    }

    /// Enables/disables missing-translation warnings.
    pub fn with_missing_warnings(mut self, warn_missing: bool) -> Self {
        self.warn_missing = warn_missing;
        self
    }
}
