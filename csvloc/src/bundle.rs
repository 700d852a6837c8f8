//! Assembles group sheets into a localization blob and its schema.

use crate::{
    config::{Group, KeySpaceConfig, KeySpaceSchema},
    csv::Writer,
    error::Error,
    sheet::GroupSheet,
};

/// A localization blob together with the schema that addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub schema: KeySpaceSchema,
    pub blob: String,
}

impl Bundle {
    /// Writes the rows of every sheet, group after group, into one blob.
    ///
    /// Group sizes in the resulting schema are the sheets' row counts, so the
    /// flat keys the schema assigns line up with the blob's rows. Fails with
    /// [`Error::Schema`] if the schema does not validate.
    ///
    /// # Example
    ///
    /// ```rust
    /// use csvloc::{Bundle, GroupSheet};
    ///
    /// let languages = ["English", "Polish"];
    /// let common = GroupSheet::parse("Common", "Key,English,Polish\nK1,Hello,Cześć\n", &languages)?;
    /// let bundle = Bundle::build(&languages, &[common])?;
    /// assert_eq!(bundle.blob, "K1,Hello,Cześć");
    /// assert_eq!(bundle.schema.groups[0].size, 1);
    /// # Ok::<(), csvloc::Error>(())
    /// ```
    pub fn build<S: AsRef<str>>(languages: &[S], sheets: &[GroupSheet]) -> Result<Self, Error> {
        let schema = KeySpaceSchema {
            languages: languages.iter().map(|l| l.as_ref().to_string()).collect(),
            groups: sheets
                .iter()
                .map(|sheet| Group::new(sheet.name.clone(), sheet.key_count()))
                .collect(),
        };
        schema.validate()?;

        let width = schema.languages.len() + 1;
        let mut writer = Writer::new();
        for sheet in sheets {
            for row in &sheet.rows {
                if row.len() != width {
                    return Err(Error::schema(format!(
                        "a row of group `{}` has {} cells, expected {width}",
                        sheet.name,
                        row.len()
                    )));
                }
                writer.add_row(row.as_slice())?;
            }
        }

        Ok(Bundle {
            schema,
            blob: writer.render().to_string(),
        })
    }

    /// The runtime config for this bundle's schema.
    pub fn config(&self) -> Result<KeySpaceConfig, Error> {
        KeySpaceConfig::try_from(self.schema.clone())
    }
}
