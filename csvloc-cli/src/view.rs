use std::{collections::HashMap, path::Path};

use csvloc::{Error, KeySpaceConfig, Localizator, Parser};

use crate::loader::load_localizator;

/// One translated key as shown by the `view` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEntry {
    pub key: usize,
    pub name: String,
    pub value: String,
}

/// Load a language and list its translations in flat-key order.
///
/// With `group` set only that group is loaded.
pub async fn collect_view(
    schema: &Path,
    blobs: &Path,
    language: &str,
    blob_name: &str,
    group: Option<&str>,
) -> Result<Vec<ViewEntry>, Error> {
    let config = KeySpaceConfig::read_from(schema)?;
    let groups = group
        .map(|name| {
            config
                .group_index(name)
                .map(|index| vec![index])
                .ok_or_else(|| Error::schema(format!("there is no group `{name}`")))
        })
        .transpose()?;

    let localizator = load_localizator(config, blobs, language, blob_name, groups).await?;
    entries(&localizator)
}

fn entries(localizator: &Localizator) -> Result<Vec<ViewEntry>, Error> {
    let names = localizator
        .string_keys()
        .map(|(name, key)| (key, name))
        .collect::<HashMap<_, _>>();
    let config = localizator.config();

    let mut entries = Vec::new();
    for (index, group) in config.groups().iter().enumerate() {
        if !localizator.is_group_loaded(index) {
            continue;
        }
        for (offset, key) in config.key_range(index).into_iter().flatten().enumerate() {
            let name = names
                .get(&key)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("{}[{offset}]", group.name));
            entries.push(ViewEntry {
                key,
                name,
                value: localizator.lookup(key)?.to_string(),
            });
        }
    }
    Ok(entries)
}

/// Print a view of the loaded translations, one tab-separated line per key.
///
/// Line breaks inside translations are shown as `\n`.
pub fn print_view(entries: &[ViewEntry]) {
    for entry in entries {
        println!(
            "{}\t{}\t{}",
            entry.key,
            entry.name,
            entry.value.replace('\n', "\\n")
        );
    }
}
