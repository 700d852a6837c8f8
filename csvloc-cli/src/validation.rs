use std::{fs, path::Path};

use csvloc::{Error, KeySpaceConfig, KeySpaceSchema};

/// Validate file path exists and is a file
pub fn validate_file_path(path: &Path) -> Result<(), Error> {
    if !path.exists() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File does not exist: {}", path.display()),
        )));
    }
    if !path.is_file() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("Path is not a file: {}", path.display()),
        )));
    }
    Ok(())
}

/// Validate a schema file, reporting every naming and sizing issue at once.
pub fn validate_schema_file(path: &Path) -> Result<KeySpaceConfig, Error> {
    validate_file_path(path)?;
    let text = fs::read_to_string(path)?;
    let schema: KeySpaceSchema = serde_json::from_str(text.trim_start_matches('\u{feff}'))?;
    schema.validate()?;
    KeySpaceConfig::try_from(schema)
}
