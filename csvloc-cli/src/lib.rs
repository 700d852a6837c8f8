//! CLI library for testing purposes

pub mod bundle;
pub mod loader;
pub mod lookup;
pub mod validation;
pub mod view;

pub use bundle::{BundleReport, SheetSpec, parse_sheet_spec, run_bundle};
pub use lookup::{KeyQuery, run_lookup};
pub use validation::validate_schema_file;
pub use view::{ViewEntry, collect_view, print_view};
