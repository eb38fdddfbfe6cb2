//! Group Registry
//!
//! Name -> group lookup owned by the hosting service.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use super::{Getter, Group};

// == Group Registry ==
/// Registered groups of one process, looked up by name.
///
/// Registration takes the write lock; lookups from request handlers share
/// the read lock.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`.
    ///
    /// A group already registered under the same name is replaced.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: u64,
        getter: impl Getter + 'static,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(name, cache_bytes, getter));
        let replaced = self
            .groups
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(group.name().to_string(), Arc::clone(&group));

        if replaced.is_some() {
            warn!(group = group.name(), "replaced existing group");
        } else {
            info!(group = group.name(), cache_bytes, "registered group");
        }
        group
    }

    // == Get Group ==
    /// Returns the group registered under `name`, if any.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// All groups, sorted by name.
    pub fn groups(&self) -> Vec<Arc<Group>> {
        let mut groups: Vec<_> = self
            .groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name().cmp(b.name()));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GetterFn;

    fn echo() -> GetterFn<impl Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync> {
        GetterFn::new(|key| Ok(key.as_bytes().to_vec()))
    }

    #[test]
    fn test_new_and_get_group() {
        let registry = GroupRegistry::new();
        let group = registry.new_group("scores", 2 << 10, echo());

        let found = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&group, &found));
        assert!(registry.get_group("missing").is_none());
    }

    #[test]
    fn test_same_name_replaces() {
        let registry = GroupRegistry::new();
        let first = registry.new_group("scores", 0, echo());
        let second = registry.new_group("scores", 0, echo());

        let found = registry.get_group("scores").unwrap();
        assert!(Arc::ptr_eq(&second, &found));
        assert!(!Arc::ptr_eq(&first, &found));
        assert_eq!(registry.groups().len(), 1);
    }

    #[test]
    fn test_groups_sorted_by_name() {
        let registry = GroupRegistry::new();
        registry.new_group("b", 0, echo());
        registry.new_group("a", 0, echo());

        let names: Vec<_> = registry
            .groups()
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
