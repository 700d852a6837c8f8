use std::path::Path;

use csvloc::{
    DirSource, Error, KeySpaceConfig, LoadSelection, Localizator, LocalizatorOptions, Phase,
};

/// Load `language` from the blob directory `blobs`.
///
/// Only `groups` are loaded when given, otherwise every group is. Loaded groups
/// are always string-mapped so keys can be shown by name.
pub async fn load_localizator(
    config: KeySpaceConfig,
    blobs: &Path,
    language: &str,
    blob_name: &str,
    groups: Option<Vec<usize>>,
) -> Result<Localizator, Error> {
    let selection = match groups {
        Some(groups) => LoadSelection::new()
            .with_groups(groups.iter().copied())
            .with_string_map(groups),
        None => {
            let mut selection = LoadSelection::all_groups(&config);
            selection.add_all_groups_to_string_map(&config);
            selection
        }
    };

    let options = LocalizatorOptions::new().with_blob_name(blob_name);
    let mut localizator = Localizator::with_options(config, options);
    let source = DirSource::new(blobs);

    let mut request = localizator.set_language_by_name(language, Some(selection));
    match request.load(&source, &mut localizator).await {
        Phase::Succeeded => Ok(localizator),
        Phase::AwaitingRetry | Phase::Pending => Err(Error::Fetch(format!(
            "no localization blob at {}",
            source.path_for(blob_name).display()
        ))),
        Phase::Failed => Err(request
            .into_failure()
            .unwrap_or_else(|| Error::Fetch("load request failed".to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csvloc::Group;
    use std::fs;

    fn config() -> KeySpaceConfig {
        KeySpaceConfig::new(
            vec!["English".to_string(), "Polish".to_string()],
            vec![Group::new("Common", 1), Group::new("Shop", 1)],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_selected_groups() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("strings.csv"), "Yes,Yes,Tak\nBuy,Buy,Kup\n").unwrap();

        let localizator = load_localizator(config(), dir.path(), "Polish", "strings", Some(vec![1]))
            .await
            .unwrap();
        assert!(!localizator.is_group_loaded(0));
        assert_eq!(localizator.lookup_str("Shop.Buy"), "Kup");
    }

    #[tokio::test]
    async fn test_missing_blob_and_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_localizator(config(), dir.path(), "English", "localizations", None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no localization blob"));

        let err = load_localizator(config(), dir.path(), "Klingon", "localizations", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedLanguage(_)));
    }
}
