//! Naming rules and full validation for key-space schemas.
//!
//! [`crate::KeySpaceConfig::new`] only enforces what the runtime depends on.
//! The checks here are the stricter ones a generator applies before emitting a
//! schema and a blob.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{config::KeySpaceSchema, error::Error};

lazy_static! {
    static ref NAME_REGEX: Regex = Regex::new(r"^[A-Z][A-Za-z0-9_]*$").unwrap();
    static ref LANGUAGE_REGEX: Regex = Regex::new(r"^[A-Z][A-Za-z]*$").unwrap();
}

/// Whether `name` is a valid group or key name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

/// Whether `name` is a valid language name.
pub fn is_valid_language(name: &str) -> bool {
    LANGUAGE_REGEX.is_match(name)
}

impl KeySpaceSchema {
    /// Every problem found in this schema, in a stable order.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.languages.is_empty() {
            issues.push("at least one language is required".to_string());
        }
        let mut seen = HashSet::new();
        for language in &self.languages {
            if !is_valid_language(language) {
                issues.push(format!(
                    "language `{language}` must start with a capital letter and contain only [a-z, A-Z]"
                ));
            }
            if !seen.insert(language.as_str()) {
                issues.push(format!("language `{language}` is declared more than once"));
            }
        }

        if self.groups.is_empty() {
            issues.push("at least one group is required".to_string());
        }
        let mut seen = HashSet::new();
        for group in &self.groups {
            if !is_valid_name(&group.name) {
                issues.push(format!(
                    "group `{}` must start with a capital letter and contain only [a-z, A-Z, 0-9, '_']",
                    group.name
                ));
            }
            if !seen.insert(group.name.as_str()) {
                issues.push(format!("group `{}` is declared more than once", group.name));
            }
            if group.size == 0 {
                issues.push(format!("group `{}` has no keys", group.name));
            }
        }

        issues
    }

    /// Fails with [`Error::Schema`] listing every issue, if there are any.
    pub fn validate(&self) -> Result<(), Error> {
        let issues = self.issues();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Error::Schema(issues.join("; ")))
        }
    }
}
