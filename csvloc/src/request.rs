//! Load requests: one asynchronous fetch of the localization blob, followed by
//! a selective decode into a [`Localizator`].
//!
//! A request starts `Pending` (or `Failed` when its language or selection is
//! invalid). Driving it with [`LoadRequest::load`] issues the fetch; the fetch
//! result is handed to [`LoadRequest::resolve`], the completion continuation:
//!
//! - no blob: `AwaitingRetry`, and the request may be loaded again;
//! - a blob that decodes: the localizator is activated, then `Succeeded`;
//! - a decode error, a fetch error or a superseded request: `Failed`.
//!
//! `Succeeded` and `Failed` are final.

use std::collections::{HashMap, hash_map::Entry};

use crate::{
    config::KeySpaceConfig, csv::Reader, error::Error, localizator::Localizator,
    selection::LoadSelection, source::BlobSource,
};

/// Where a [`LoadRequest`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// The fetch is in flight or has not been issued yet.
    Pending,
    /// Translations were applied and the language activated.
    Succeeded,
    /// The request ended without touching the localizator.
    Failed,
    /// The blob was not available; the request may be loaded again.
    AwaitingRetry,
}

impl Phase {
    pub fn is_finished(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }

    /// `true` for `Succeeded` and for the non-failure `AwaitingRetry`.
    pub fn is_success(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::AwaitingRetry)
    }
}

/// Handle for loading one language into a [`Localizator`].
#[derive(Debug)]
pub struct LoadRequest {
    language: Option<usize>,
    selection: LoadSelection,
    generation: u64,
    phase: Phase,
    failure: Option<Error>,
}

impl LoadRequest {
    /// Creates a request for `language`, failing it immediately if the language
    /// or the selection does not fit `config`.
    pub(crate) fn new(
        config: &KeySpaceConfig,
        language: usize,
        selection: LoadSelection,
        generation: u64,
    ) -> Self {
        let count = config.language_count();
        let invalid = if language >= count {
            Some(Error::LanguageOutOfRange {
                index: language,
                count,
            })
        } else {
            selection.validate(config).err()
        };

        let request = LoadRequest {
            language: Some(language),
            selection,
            generation,
            phase: Phase::Pending,
            failure: None,
        };
        match invalid {
            Some(error) => request.into_failed(error),
            None => request,
        }
    }

    /// Creates a request that failed before a language could be resolved.
    pub(crate) fn rejected(selection: LoadSelection, generation: u64, error: Error) -> Self {
        LoadRequest {
            language: None,
            selection,
            generation,
            phase: Phase::Pending,
            failure: None,
        }
        .into_failed(error)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_finished()
    }

    pub fn is_success(&self) -> bool {
        self.phase.is_success()
    }

    /// Why the request failed, once it has.
    pub fn failure(&self) -> Option<&Error> {
        self.failure.as_ref()
    }

    /// Consumes the request, returning why it failed.
    pub fn into_failure(self) -> Option<Error> {
        self.failure
    }

    /// The requested language index, if one was resolved.
    pub fn language(&self) -> Option<usize> {
        self.language
    }

    pub fn selection(&self) -> &LoadSelection {
        &self.selection
    }

    /// The localizator generation this request was issued for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetches the blob from `source` and resolves the request with it.
    ///
    /// Only `Pending` and `AwaitingRetry` requests issue a fetch; finished
    /// requests return their phase unchanged.
    pub async fn load<S>(&mut self, source: &S, localizator: &mut Localizator) -> Phase
    where
        S: BlobSource + ?Sized,
    {
        if self.phase.is_finished() {
            return self.phase;
        }
        self.phase = Phase::Pending;

        let blob_name = localizator.options().blob_name.clone();
        tracing::debug!(
            language = ?self.language,
            generation = self.generation,
            blob = %blob_name,
            "Fetching localization blob"
        );

        match source.fetch(&blob_name).await {
            Ok(blob) => self.resolve(blob.as_deref(), localizator),
            Err(e) => self.fail(Error::Fetch(e.to_string())),
        }
    }

    /// Completes the request with the outcome of a fetch.
    ///
    /// Results for a localizator that was cleared after this request was issued
    /// are discarded and the request fails with [`Error::StaleRequest`].
    pub fn resolve(&mut self, blob: Option<&str>, localizator: &mut Localizator) -> Phase {
        if self.phase.is_finished() {
            return self.phase;
        }

        let current = localizator.generation();
        if self.generation != current {
            tracing::debug!(
                request = self.generation,
                current,
                "Discarding superseded load request"
            );
            return self.fail(Error::StaleRequest {
                request: self.generation,
                current,
            });
        }

        let Some(blob) = blob else {
            tracing::debug!(language = ?self.language, "Localization blob not available yet");
            self.phase = Phase::AwaitingRetry;
            return self.phase;
        };

        let Some(language) = self.language else {
            return self.phase;
        };

        let warn_missing = localizator.options().warn_missing;
        match decode(
            blob,
            localizator.config(),
            language,
            &self.selection,
            warn_missing,
        ) {
            Ok(staged) => {
                localizator.activate(language, staged);
                self.phase = Phase::Succeeded;
                tracing::debug!(language, "Language loaded");
            }
            Err(e) => {
                tracing::error!(language, "Failed to decode localization blob: {e}");
                self.fail(e);
            }
        }
        self.phase
    }

    fn fail(&mut self, error: Error) -> Phase {
        self.failure = Some(error);
        self.phase = Phase::Failed;
        self.phase
    }

    fn into_failed(mut self, error: Error) -> Self {
        tracing::debug!(language = ?self.language, "Rejected load request: {error}");
        self.fail(error);
        self
    }
}

/// Decoded translations waiting to be applied to a localizator.
#[derive(Debug, Default)]
pub(crate) struct Staged {
    pub(crate) tables: Vec<Option<Box<[String]>>>,
    pub(crate) string_map: HashMap<String, usize>,
}

/// Placeholder used for a key whose row or language cell is missing.
pub fn sentinel(group: usize, offset: usize) -> String {
    format!("NOT_TRANSLATED_[{group}][{offset}]")
}

/// Decodes the selected groups of `blob` for one language.
///
/// Rows of unselected groups are still consumed so later groups stay aligned.
fn decode(
    blob: &str,
    config: &KeySpaceConfig,
    language: usize,
    selection: &LoadSelection,
    warn_missing: bool,
) -> Result<Staged, Error> {
    let column = config
        .language(language)
        .map_or(0, |name| config.file_column_index(name));

    let mut reader = Reader::from_text(blob);
    let mut staged = Staged {
        tables: Vec::with_capacity(config.group_count()),
        string_map: HashMap::new(),
    };
    let mut row = Vec::new();
    let mut first_key = 0;

    for (index, group) in config.groups().iter().enumerate() {
        if !selection.should_load(index) {
            for _ in 0..group.size {
                reader.skip_row()?;
            }
            staged.tables.push(None);
            first_key += group.size;
            continue;
        }

        let map_keys = selection.should_string_map(index);
        let mut table = Vec::with_capacity(group.size);
        for offset in 0..group.size {
            let translation = if map_keys {
                row.clear();
                reader.read_row(&mut row)?;
                if let Some(key) = row.first() {
                    insert_string_key(
                        &mut staged.string_map,
                        format!("{}.{}", group.name, key),
                        first_key + offset,
                    );
                }
                row.get_mut(column).map(std::mem::take)
            } else {
                reader.read_column(column)?
            };

            table.push(translation.unwrap_or_else(|| {
                if warn_missing {
                    tracing::warn!("No translation for the key [{index}][{offset}]");
                }
                sentinel(index, offset)
            }));
        }
        staged.tables.push(Some(table.into_boxed_slice()));
        first_key += group.size;
    }

    if !reader.is_exhausted()? {
        tracing::warn!(
            line = reader.line_number(),
            "Localization blob has rows beyond the last group"
        );
    }
    Ok(staged)
}

fn insert_string_key(map: &mut HashMap<String, usize>, key: String, flat_key: usize) {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(flat_key);
        }
        Entry::Occupied(slot) => {
            tracing::warn!(
                key = %slot.key(),
                kept = *slot.get(),
                ignored = flat_key,
                "Duplicate string key"
            );
        }
    }
}
