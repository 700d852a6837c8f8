use std::path::Path;

use csvloc::{Error, KeySpaceConfig, Parser};

use crate::loader::load_localizator;

/// How the `lookup` command addresses a translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQuery {
    /// A flat integer key.
    Flat(usize),
    /// A `"Group.Key"` string key.
    Named(String),
}

impl KeyQuery {
    /// Builds a query from the `--key`/`--name` pair. A flat key wins when both
    /// are given; `None` when neither is.
    pub fn from_args(key: Option<usize>, name: Option<String>) -> Option<Self> {
        match (key, name) {
            (Some(key), _) => Some(Self::Flat(key)),
            (None, Some(name)) => Some(Self::Named(name)),
            (None, None) => None,
        }
    }
}

/// Look up one translation, loading only the group that holds it.
///
/// String keys that do not exist resolve the way the runtime resolves them,
/// to `"<key> (not string mapped)"`.
pub async fn run_lookup(
    schema: &Path,
    blobs: &Path,
    language: &str,
    blob_name: &str,
    query: &KeyQuery,
) -> Result<String, Error> {
    let config = KeySpaceConfig::read_from(schema)?;
    let group = match query {
        KeyQuery::Flat(key) => {
            config
                .locate(*key)
                .ok_or(Error::KeyOutOfRange {
                    key: *key,
                    total: config.total_keys(),
                })?
                .0
        }
        KeyQuery::Named(name) => {
            let Some((group, _)) = name.split_once('.') else {
                return Err(Error::InvalidSelection(format!(
                    "`{name}` is not a Group.Key string key"
                )));
            };
            config
                .group_index(group)
                .ok_or_else(|| Error::schema(format!("there is no group `{group}`")))?
        }
    };

    let localizator = load_localizator(config, blobs, language, blob_name, Some(vec![group])).await?;
    match query {
        KeyQuery::Flat(key) => localizator.lookup(*key).map(str::to_string),
        KeyQuery::Named(name) => Ok(localizator.lookup_str(name).into_owned()),
    }
}
