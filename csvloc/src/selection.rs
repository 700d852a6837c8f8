//! Which groups a load materializes, and which of those get string-key access.

use std::collections::BTreeSet;

use crate::{config::KeySpaceConfig, error::Error};

/// The set of groups to load, and the subset to index by `"Group.Key"`.
///
/// A group marked for string-mapping is only mapped when it is also loaded.
///
/// # Example
///
/// ```rust
/// use csvloc::{Group, KeySpaceConfig, LoadSelection};
///
/// let config = KeySpaceConfig::new(
///     vec!["English".to_string()],
///     vec![Group::new("Common", 2), Group::new("Shop", 1)],
/// )?;
/// let selection = LoadSelection::new()
///     .with_group_named(&config, "Shop")?
///     .with_string_map_named(&config, "Shop")?;
/// assert!(!selection.should_load(0));
/// assert!(selection.should_string_map(1));
/// # Ok::<(), csvloc::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadSelection {
    load: BTreeSet<usize>,
    string_map: BTreeSet<usize>,
}

impl LoadSelection {
    /// An empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every group loaded, none string-mapped.
    pub fn all_groups(config: &KeySpaceConfig) -> Self {
        let mut selection = Self::new();
        selection.add_all_groups_to_load(config);
        selection
    }

    pub fn add_groups_to_load<I: IntoIterator<Item = usize>>(&mut self, groups: I) {
        self.load.extend(groups);
    }

    pub fn add_all_groups_to_load(&mut self, config: &KeySpaceConfig) {
        self.load.extend(0..config.group_count());
    }

    pub fn add_groups_to_string_map<I: IntoIterator<Item = usize>>(&mut self, groups: I) {
        self.string_map.extend(groups);
    }

    pub fn add_all_groups_to_string_map(&mut self, config: &KeySpaceConfig) {
        self.string_map.extend(0..config.group_count());
    }

    /// Marks a group for loading by name.
    pub fn add_group_named(&mut self, config: &KeySpaceConfig, name: &str) -> Result<(), Error> {
        let index = resolve(config, name)?;
        self.load.insert(index);
        Ok(())
    }

    /// Marks a group for string-mapping by name.
    pub fn add_string_map_named(
        &mut self,
        config: &KeySpaceConfig,
        name: &str,
    ) -> Result<(), Error> {
        let index = resolve(config, name)?;
        self.string_map.insert(index);
        Ok(())
    }

    pub fn with_groups<I: IntoIterator<Item = usize>>(mut self, groups: I) -> Self {
        self.add_groups_to_load(groups);
        self
    }

    pub fn with_string_map<I: IntoIterator<Item = usize>>(mut self, groups: I) -> Self {
        self.add_groups_to_string_map(groups);
        self
    }

    pub fn with_group_named(mut self, config: &KeySpaceConfig, name: &str) -> Result<Self, Error> {
        self.add_group_named(config, name)?;
        Ok(self)
    }

    pub fn with_string_map_named(
        mut self,
        config: &KeySpaceConfig,
        name: &str,
    ) -> Result<Self, Error> {
        self.add_string_map_named(config, name)?;
        Ok(self)
    }

    pub fn should_load(&self, group: usize) -> bool {
        self.load.contains(&group)
    }

    pub fn should_string_map(&self, group: usize) -> bool {
        self.load.contains(&group) && self.string_map.contains(&group)
    }

    /// Indexes of the groups to load, ascending.
    pub fn loaded_groups(&self) -> impl Iterator<Item = usize> + '_ {
        self.load.iter().copied()
    }

    /// Checks the selection against a schema: it must load at least one group and
    /// reference only existing groups.
    pub fn validate(&self, config: &KeySpaceConfig) -> Result<(), Error> {
        if self.load.is_empty() {
            return Err(Error::InvalidSelection(
                "at least one group must be selected for loading".to_string(),
            ));
        }

        let count = config.group_count();
        if let Some(&group) = self.load.union(&self.string_map).find(|&&g| g >= count) {
            return Err(Error::GroupOutOfRange { group, count });
        }
        Ok(())
    }
}

fn resolve(config: &KeySpaceConfig, name: &str) -> Result<usize, Error> {
    config
        .group_index(name)
        .ok_or_else(|| Error::schema(format!("unknown group `{name}`")))
}
