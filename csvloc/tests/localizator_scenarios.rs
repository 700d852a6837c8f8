use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use csvloc::{
    BlobSource, Error, Group, KeySpaceConfig, LoadSelection, Localizator, LocalizatorOptions,
    MemorySource, Phase,
};
use futures::{
    executor::block_on,
    future::{self, BoxFuture, FutureExt},
};
use indoc::indoc;

const BLOB: &str = "K1,Hello,Cześć\nK2,World,Świat\nK3,Buy,Kup\n";

fn config() -> KeySpaceConfig {
    KeySpaceConfig::new(
        vec!["English".to_string(), "Polish".to_string()],
        vec![Group::new("Common", 2), Group::new("Shop", 1)],
    )
    .unwrap()
}

fn source() -> MemorySource {
    MemorySource::new().with_blob("localizations", BLOB)
}

/// Counts fetches and fails each one.
#[derive(Default)]
struct FailingSource {
    calls: Cell<usize>,
}

impl BlobSource for FailingSource {
    fn fetch<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, Result<Option<String>, Error>> {
        self.calls.set(self.calls.get() + 1);
        future::ready(Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ))))
        .boxed()
    }
}

#[test]
fn test_english_over_all_groups() {
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(0, None, &source()));

    assert!(request.is_finished());
    assert!(request.is_success());
    assert_eq!(localizator.active_language(), Some(0));
    assert_eq!(localizator.lookup(0).unwrap(), "Hello");
    assert_eq!(localizator.lookup(1).unwrap(), "World");
    assert_eq!(localizator.lookup(2).unwrap(), "Buy");
}

#[test]
fn test_polish_over_all_groups() {
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(1, None, &source()));

    assert_eq!(request.phase(), Phase::Succeeded);
    assert_eq!(localizator.active_language_name(), Some("Polish"));
    assert_eq!(localizator.lookup(0).unwrap(), "Cześć");
    assert_eq!(localizator.lookup(2).unwrap(), "Kup");
}

#[test]
fn test_polish_from_crlf_blob() {
    let source = MemorySource::new().with_blob(
        "localizations",
        "K1,Hello,Cześć\r\nK2,World,Świat\r\nK3,Buy,Kup\r\n",
    );
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(1, None, &source));

    assert!(request.is_success());
    assert_eq!(localizator.lookup(0).unwrap(), "Cześć");
    assert_eq!(localizator.lookup(1).unwrap(), "Świat");
    assert_eq!(localizator.lookup(2).unwrap(), "Kup");
}

#[test]
fn test_missing_column_yields_sentinel() {
    let source = MemorySource::new().with_blob(
        "localizations",
        indoc! {"
            K1,Hello
            K2,World,Świat
            K3,Buy,Kup
        "},
    );
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(1, None, &source));

    assert_eq!(request.phase(), Phase::Succeeded);
    assert_eq!(localizator.lookup(0).unwrap(), "NOT_TRANSLATED_[0][0]");
    assert_eq!(localizator.lookup(1).unwrap(), "Świat");
}

#[test]
fn test_truncated_blob_yields_sentinels() {
    let source = MemorySource::new().with_blob("localizations", "K1,Hello,Cześć");
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(0, None, &source));

    assert!(request.is_success());
    assert_eq!(localizator.lookup(0).unwrap(), "Hello");
    assert_eq!(localizator.lookup(1).unwrap(), "NOT_TRANSLATED_[0][1]");
    assert_eq!(localizator.lookup(2).unwrap(), "NOT_TRANSLATED_[1][0]");
}

#[test]
fn test_subset_load_populates_only_selected_groups() {
    let config = KeySpaceConfig::new(
        vec!["English".to_string()],
        vec![
            Group::new("Common", 2),
            Group::new("Shop", 1),
            Group::new("Settings", 3),
        ],
    )
    .unwrap();
    let blob = indoc! {r#"
        A,"first
        line"
        B,b
        C,c
        D,"d, with comma"
        E,"say ""e"""
        F,f
    "#};
    let source = MemorySource::new().with_blob("localizations", blob);

    let mut localizator = Localizator::new(config);
    let selection = LoadSelection::new().with_groups([0, 2]);
    let request = block_on(localizator.load_language(0, Some(selection), &source));
    assert!(request.is_success());

    assert!(localizator.is_group_loaded(0));
    assert!(!localizator.is_group_loaded(1));
    assert!(localizator.is_group_loaded(2));

    assert_eq!(localizator.lookup(0).unwrap(), "first\nline");
    assert!(matches!(
        localizator.lookup(2),
        Err(Error::GroupNotLoaded { group: 1, key: 2 })
    ));
    assert_eq!(localizator.lookup(3).unwrap(), "d, with comma");
    assert_eq!(localizator.lookup(4).unwrap(), "say \"e\"");
    assert_eq!(localizator.lookup(5).unwrap(), "f");
}

#[test]
fn test_string_keys() {
    let mut localizator = Localizator::new(config());
    let mut selection = LoadSelection::all_groups(localizator.config());
    selection.add_all_groups_to_string_map(localizator.config());
    block_on(localizator.load_language(0, Some(selection), &source()));

    assert_eq!(localizator.lookup_str("Common.K1"), "Hello");
    assert_eq!(localizator.lookup_str("Common.K2"), "World");
    assert_eq!(localizator.lookup_str("Shop.K3"), "Buy");
    assert_eq!(
        localizator.lookup_str("Shop.Typo"),
        "Shop.Typo (not string mapped)"
    );
    assert_eq!(localizator.string_key_count(), 3);
}

#[test]
fn test_string_keys_absent_without_mapping() {
    let mut localizator = Localizator::new(config());
    block_on(localizator.load_language(0, None, &source()));
    assert_eq!(
        localizator.lookup_str("Common.K1"),
        "Common.K1 (not string mapped)"
    );
}

#[test]
fn test_out_of_range_language_fails_without_fetch() {
    let source = FailingSource::default();
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(5, None, &source));

    assert!(request.is_finished());
    assert!(!request.is_success());
    assert!(matches!(
        request.failure(),
        Some(Error::LanguageOutOfRange { index: 5, count: 2 })
    ));
    assert_eq!(localizator.active_language(), None);
    assert_eq!(source.calls.get(), 0);
}

#[test]
fn test_invalid_selection_fails() {
    let mut localizator = Localizator::new(config());
    let request = localizator.set_language(0, Some(LoadSelection::new()));
    assert_eq!(request.phase(), Phase::Failed);
    assert!(matches!(request.failure(), Some(Error::InvalidSelection(_))));

    let request = localizator.set_language(0, Some(LoadSelection::new().with_groups([7])));
    assert!(matches!(
        request.failure(),
        Some(Error::GroupOutOfRange { group: 7, count: 2 })
    ));
}

#[test]
fn test_fetch_error_fails_request() {
    let source = FailingSource::default();
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(0, None, &source));

    assert_eq!(request.phase(), Phase::Failed);
    assert!(matches!(request.failure(), Some(Error::Fetch(_))));
    assert_eq!(source.calls.get(), 1);
    assert_eq!(localizator.active_language(), None);
}

#[test]
fn test_malformed_blob_fails_and_leaves_state_clear() {
    let source = MemorySource::new().with_blob("localizations", "K1,\"Hello\nK2,World\n");
    let mut localizator = Localizator::new(config());
    let request = block_on(localizator.load_language(0, None, &source));

    assert_eq!(request.phase(), Phase::Failed);
    assert!(matches!(request.failure(), Some(Error::Format { .. })));
    assert!(!localizator.is_group_loaded(0));
    assert_eq!(localizator.active_language(), None);
}

#[test]
fn test_awaiting_retry_then_success() {
    let mut source = MemorySource::new();
    let mut localizator = Localizator::new(config());
    let mut request = localizator.set_language(1, None);

    assert_eq!(block_on(request.load(&source, &mut localizator)), Phase::AwaitingRetry);
    assert!(!request.is_finished());
    assert!(request.is_success());
    assert_eq!(localizator.active_language(), None);

    source.insert("localizations", BLOB);
    assert_eq!(block_on(request.load(&source, &mut localizator)), Phase::Succeeded);
    assert_eq!(localizator.lookup(1).unwrap(), "Świat");
}

#[test]
fn test_retry_after_newer_request_is_stale() {
    let empty = MemorySource::new();
    let mut localizator = Localizator::new(config());
    let mut old = localizator.set_language(0, None);
    assert_eq!(block_on(old.load(&empty, &mut localizator)), Phase::AwaitingRetry);

    let mut newer = localizator.set_language(1, None);
    assert_eq!(block_on(old.load(&source(), &mut localizator)), Phase::Failed);
    assert!(matches!(old.failure(), Some(Error::StaleRequest { .. })));
    assert_eq!(localizator.active_language(), None);

    assert_eq!(block_on(newer.load(&source(), &mut localizator)), Phase::Succeeded);
    assert_eq!(localizator.active_language(), Some(1));
}

#[test]
fn test_set_language_clears_previous_language() {
    let mut localizator = Localizator::new(config());
    block_on(localizator.load_language(0, None, &source()));
    assert_eq!(localizator.lookup(0).unwrap(), "Hello");

    let request = localizator.set_language(1, None);
    assert_eq!(request.phase(), Phase::Pending);
    assert_eq!(localizator.active_language(), None);
    assert!(localizator.lookup(0).is_err());
}

#[test]
fn test_language_changed_notifications() {
    let mut localizator = Localizator::new(config());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    localizator.subscribe(move |l| {
        sink.borrow_mut()
            .push(l.lookup(0).map(str::to_string).unwrap_or_default());
    });

    block_on(localizator.load_language(0, None, &source()));
    block_on(localizator.load_language(5, None, &source()));
    block_on(localizator.load_language(1, None, &source()));
    localizator.clear();

    assert_eq!(*seen.borrow(), vec!["Hello".to_string(), "Cześć".to_string()]);
}

#[test]
fn test_custom_blob_name() {
    let options = LocalizatorOptions::new()
        .with_blob_name("game_strings")
        .with_missing_warnings(false);
    let source = MemorySource::new().with_blob("game_strings", BLOB);
    let mut localizator = Localizator::with_options(config(), options);

    let request = block_on(localizator.load_language(0, None, &source));
    assert!(request.is_finished() && request.is_success());

    let request = block_on(localizator.load_language(0, None, &MemorySource::new()));
    assert_eq!(request.phase(), Phase::AwaitingRetry);
}

#[test]
fn test_flat_keys_follow_declared_group_order() {
    let config = KeySpaceConfig::new(
        vec!["English".to_string()],
        vec![
            Group::new("A", 3),
            Group::new("B", 1),
            Group::new("C", 5),
            Group::new("D", 2),
        ],
    )
    .unwrap();

    let mut expected = Vec::new();
    for (group, g) in config.groups().iter().enumerate() {
        for offset in 0..g.size {
            expected.push((group, offset));
        }
    }

    let resolved = (0..config.total_keys())
        .map(|key| config.locate(key).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(resolved, expected);
}
