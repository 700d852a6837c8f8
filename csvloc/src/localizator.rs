//! The localization access unit: owns the loaded translations and the active
//! language, and hands out [`LoadRequest`]s to change them.

use std::{borrow::Cow, collections::HashMap, fmt};

use crate::{
    config::KeySpaceConfig,
    error::Error,
    options::LocalizatorOptions,
    request::{LoadRequest, Staged},
    selection::LoadSelection,
    source::BlobSource,
};

/// Handle returned by [`Localizator::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id: SubscriptionId,
    callback: Box<dyn FnMut(&Localizator)>,
}

/// Serves translations by flat key or by `"Group.Key"` string key.
///
/// Not thread-safe: one request at a time is meaningful, and a new
/// [`Localizator::set_language`] call supersedes any earlier request.
///
/// # Example
///
/// ```rust
/// use csvloc::{Group, KeySpaceConfig, Localizator, MemorySource};
///
/// let config = KeySpaceConfig::new(
///     vec!["English".to_string(), "Polish".to_string()],
///     vec![Group::new("Common", 2), Group::new("Shop", 1)],
/// )?;
/// let source = MemorySource::new()
///     .with_blob("localizations", "K1,Hello,Cześć\nK2,World,Świat\nK3,Buy,Kup\n");
///
/// let mut localizator = Localizator::new(config);
/// let request = futures::executor::block_on(localizator.load_language(1, None, &source));
/// assert!(request.is_finished() && request.is_success());
/// assert_eq!(localizator.lookup(0)?, "Cześć");
/// # Ok::<(), csvloc::Error>(())
/// ```
pub struct Localizator {
    config: KeySpaceConfig,
    options: LocalizatorOptions,
    tables: Vec<Option<Box<[String]>>>,
    string_map: HashMap<String, usize>,
    active_language: Option<usize>,
    generation: u64,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
}

impl Localizator {
    pub fn new(config: KeySpaceConfig) -> Self {
        Self::with_options(config, LocalizatorOptions::default())
    }

    pub fn with_options(config: KeySpaceConfig, options: LocalizatorOptions) -> Self {
        let tables = vec![None; config.group_count()];
        Self {
            config,
            options,
            tables,
            string_map: HashMap::new(),
            active_language: None,
            generation: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn config(&self) -> &KeySpaceConfig {
        &self.config
    }

    pub fn options(&self) -> &LocalizatorOptions {
        &self.options
    }

    /// Advances on every [`Localizator::clear`]; requests from older generations
    /// are discarded on completion.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the loaded language, or `None` when no language is active.
    pub fn active_language(&self) -> Option<usize> {
        self.active_language
    }

    pub fn active_language_name(&self) -> Option<&str> {
        self.active_language
            .and_then(|index| self.config.language(index))
    }

    pub fn is_group_loaded(&self, group: usize) -> bool {
        matches!(self.tables.get(group), Some(Some(_)))
    }

    pub fn string_key_count(&self) -> usize {
        self.string_map.len()
    }

    /// The flat key mapped to `"Group.Key"`, if that group was string-mapped.
    pub fn string_key(&self, key: &str) -> Option<usize> {
        self.string_map.get(key).copied()
    }

    /// Every mapped `"Group.Key"` string key with its flat key, in no particular order.
    pub fn string_keys(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.string_map.iter().map(|(key, &flat)| (key.as_str(), flat))
    }

    /// Returns the translation for a flat key.
    ///
    /// Fails when the key is outside the key space or its group is not loaded.
    pub fn lookup(&self, key: usize) -> Result<&str, Error> {
        let (group, offset) = self.config.locate(key).ok_or(Error::KeyOutOfRange {
            key,
            total: self.config.total_keys(),
        })?;

        self.tables
            .get(group)
            .and_then(Option::as_deref)
            .and_then(|table| table.get(offset))
            .map(String::as_str)
            .ok_or(Error::GroupNotLoaded { group, key })
    }

    /// Returns the translation for a `"Group.Key"` string key.
    ///
    /// Never fails: keys that are not mapped come back as
    /// `"<key> (not string mapped)"`.
    pub fn lookup_str<'a>(&'a self, key: &str) -> Cow<'a, str> {
        match self.string_map.get(key).map(|&flat| self.lookup(flat)) {
            Some(Ok(translation)) => Cow::Borrowed(translation),
            _ => Cow::Owned(format!("{key} (not string mapped)")),
        }
    }

    /// Clears the current translations and starts loading `language`.
    ///
    /// Without a selection every group is loaded and none is string-mapped.
    /// An invalid language or selection yields an already failed request.
    pub fn set_language(
        &mut self,
        language: usize,
        selection: Option<LoadSelection>,
    ) -> LoadRequest {
        self.clear();
        let selection = selection.unwrap_or_else(|| LoadSelection::all_groups(&self.config));
        LoadRequest::new(&self.config, language, selection, self.generation)
    }

    /// Like [`Localizator::set_language`], resolving the language by name.
    pub fn set_language_by_name(
        &mut self,
        name: &str,
        selection: Option<LoadSelection>,
    ) -> LoadRequest {
        match self.config.language_index(name) {
            Some(index) => self.set_language(index, selection),
            None => {
                self.clear();
                let selection =
                    selection.unwrap_or_else(|| LoadSelection::all_groups(&self.config));
                LoadRequest::rejected(
                    selection,
                    self.generation,
                    Error::UnsupportedLanguage(name.to_string()),
                )
            }
        }
    }

    /// Sets the language and drives the resulting request through one fetch.
    pub async fn load_language<S>(
        &mut self,
        language: usize,
        selection: Option<LoadSelection>,
        source: &S,
    ) -> LoadRequest
    where
        S: BlobSource + ?Sized,
    {
        let mut request = self.set_language(language, selection);
        request.load(source, self).await;
        request
    }

    /// Drops every loaded table and string key and deactivates the language.
    ///
    /// Subscribers are not notified.
    pub fn clear(&mut self) {
        self.active_language = None;
        self.tables.iter_mut().for_each(|table| *table = None);
        self.string_map.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Registers a callback invoked every time a language becomes active.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Localizator) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Removes a callback. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    pub(crate) fn activate(&mut self, language: usize, staged: Staged) {
        self.tables = staged.tables;
        self.string_map = staged.string_map;
        self.active_language = Some(language);

        let mut subscribers = std::mem::take(&mut self.subscribers);
        for subscriber in &mut subscribers {
            (subscriber.callback)(self);
        }
        self.subscribers = subscribers;
    }
}

impl fmt::Debug for Localizator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizator")
            .field("config", &self.config)
            .field("options", &self.options)
            .field("active_language", &self.active_language)
            .field(
                "loaded_groups",
                &(0..self.tables.len())
                    .filter(|&g| self.is_group_loaded(g))
                    .collect::<Vec<_>>(),
            )
            .field("string_keys", &self.string_map.len())
            .field("generation", &self.generation)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
