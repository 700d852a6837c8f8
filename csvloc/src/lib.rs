#![forbid(unsafe_code)]
//! Flat-key localization runtime backed by a streaming CSV codec.
//!
//! Translations live in a single CSV blob: one row per key, grouped and
//! ordered as declared by a [`KeySpaceConfig`], with column 0 holding the key
//! name and one column per supported language after it. A [`Localizator`]
//! loads one language at a time, optionally only a subset of groups, and
//! serves strings by integer flat key or by `"Group.Key"` string key.
//!
//! # Quick Start
//!
//! ```rust
//! use csvloc::{Group, KeySpaceConfig, LoadSelection, Localizator, MemorySource};
//!
//! let config = KeySpaceConfig::new(
//!     vec!["English".to_string(), "Polish".to_string()],
//!     vec![Group::new("Common", 2), Group::new("Shop", 1)],
//! )?;
//! let source = MemorySource::new()
//!     .with_blob("localizations", "K1,Hello,Cześć\nK2,World,Świat\nK3,Buy,Kup\n");
//!
//! let mut localizator = Localizator::new(config);
//! let selection = LoadSelection::new()
//!     .with_group_named(localizator.config(), "Shop")?
//!     .with_string_map_named(localizator.config(), "Shop")?;
//!
//! let request = futures::executor::block_on(
//!     localizator.load_language(0, Some(selection), &source),
//! );
//! assert!(request.is_success());
//! assert_eq!(localizator.lookup(2)?, "Buy");
//! assert_eq!(localizator.lookup_str("Shop.K3"), "Buy");
//! assert!(localizator.lookup(0).is_err());
//! # Ok::<(), csvloc::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`csv`]: streaming reader and buffered writer for the blob dialect
//! - [`config`]: the immutable key-space schema
//! - [`selection`], [`request`], [`localizator`]: the loading runtime
//! - [`source`]: blob sources (in memory, directory)
//! - [`sheet`], [`bundle`], [`schema`]: producer-side sheet parsing, blob
//!   assembly and schema validation

pub mod bundle;
pub mod config;
pub mod csv;
pub mod error;
pub mod localizator;
pub mod options;
pub mod request;
pub mod schema;
pub mod selection;
pub mod sheet;
pub mod source;
pub mod traits;

// Re-export most used types for easy consumption
pub use crate::{
    bundle::Bundle,
    config::{Group, KeySpaceConfig, KeySpaceSchema},
    error::Error,
    localizator::{Localizator, SubscriptionId},
    options::LocalizatorOptions,
    request::{LoadRequest, Phase},
    selection::LoadSelection,
    sheet::GroupSheet,
    source::{BlobSource, DirSource, MemorySource},
    traits::Parser,
};
