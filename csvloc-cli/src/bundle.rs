use std::{
    fs,
    path::{Path, PathBuf},
};

use csvloc::{Bundle, DirSource, Error, GroupSheet, Parser};

/// File name of the schema written next to the blob.
pub const SCHEMA_FILE: &str = "schema.json";

/// A `GROUP=PATH` argument naming the sheet of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSpec {
    pub group: String,
    pub path: PathBuf,
}

/// Parse a `GROUP=PATH` sheet argument.
pub fn parse_sheet_spec(value: &str) -> Result<SheetSpec, String> {
    let Some((group, path)) = value.split_once('=') else {
        return Err(format!("Invalid sheet `{value}`: expected GROUP=PATH"));
    };
    let (group, path) = (group.trim(), path.trim());
    if group.is_empty() || path.is_empty() {
        return Err(format!("Invalid sheet `{value}`: expected GROUP=PATH"));
    }
    Ok(SheetSpec {
        group: group.to_string(),
        path: PathBuf::from(path),
    })
}

/// What [`run_bundle`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    pub blob_path: PathBuf,
    pub schema_path: PathBuf,
    pub groups: usize,
    pub keys: usize,
}

/// Build a blob from group sheets and write it with its schema into `out`.
///
/// Groups are laid out in the order the sheets are given.
pub fn run_bundle(
    languages: &[String],
    sheets: &[SheetSpec],
    out: &Path,
    blob_name: &str,
) -> Result<BundleReport, Error> {
    let parsed = sheets
        .iter()
        .map(|sheet| {
            tracing::debug!(group = %sheet.group, path = %sheet.path.display(), "Reading sheet");
            GroupSheet::read_from(&sheet.group, &sheet.path, languages)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let bundle = Bundle::build(languages, &parsed)?;
    let config = bundle.config()?;

    fs::create_dir_all(out)?;
    let blob_path = DirSource::new(out).path_for(blob_name);
    fs::write(&blob_path, &bundle.blob)?;
    let schema_path = out.join(SCHEMA_FILE);
    config.write_to(&schema_path)?;

    Ok(BundleReport {
        blob_path,
        schema_path,
        groups: config.group_count(),
        keys: config.total_keys(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sheet_spec() {
        let spec = parse_sheet_spec("Common=sheets/common.csv").unwrap();
        assert_eq!(spec.group, "Common");
        assert_eq!(spec.path, PathBuf::from("sheets/common.csv"));

        assert!(parse_sheet_spec("Common").is_err());
        assert!(parse_sheet_spec("=common.csv").is_err());
        assert!(parse_sheet_spec("Common=").is_err());
    }

    #[test]
    fn test_run_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let common = dir.path().join("common.csv");
        fs::write(&common, "Key,Polish,English\nYes,Tak,Yes\nNo,Nie,No\n").unwrap();

        let languages = vec!["English".to_string(), "Polish".to_string()];
        let sheets = vec![SheetSpec {
            group: "Common".to_string(),
            path: common,
        }];
        let out = dir.path().join("out");
        let report = run_bundle(&languages, &sheets, &out, "localizations").unwrap();

        assert_eq!(report.groups, 1);
        assert_eq!(report.keys, 2);
        assert_eq!(
            fs::read_to_string(&report.blob_path).unwrap(),
            "Yes,Yes,Tak\nNo,No,Nie"
        );
        assert!(report.schema_path.ends_with(SCHEMA_FILE));
    }

    #[test]
    fn test_run_bundle_missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let sheets = vec![SheetSpec {
            group: "Common".to_string(),
            path: dir.path().join("missing.csv"),
        }];
        let err = run_bundle(&["English".to_string()], &sheets, dir.path(), "localizations")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
