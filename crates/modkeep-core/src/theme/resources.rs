use std::collections::BTreeMap;

use super::ResourceLocator;
use crate::color::Color;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceValue {
    Color(Color),
    Text(String),
}

impl ResourceValue {
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            ResourceValue::Color(c) => Some(*c),
            ResourceValue::Text(_) => None,
        }
    }
}

/// A key/value resource table, optionally tagged with the locator it was
/// loaded from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceSet {
    origin: Option<ResourceLocator>,
    entries: BTreeMap<String, ResourceValue>,
}

impl ResourceSet {
    #[must_use]
    pub fn new(origin: Option<ResourceLocator>) -> Self {
        Self {
            origin,
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_entries(
        origin: Option<ResourceLocator>,
        entries: impl IntoIterator<Item = (String, ResourceValue)>,
    ) -> Self {
        Self {
            origin,
            entries: entries.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn origin(&self) -> Option<&ResourceLocator> {
        self.origin.as_ref()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ResourceValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or replaces a value and returns the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: ResourceValue) -> Option<ResourceValue> {
        self.entries.insert(key.into(), value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn is_theme(&self) -> bool {
        self.origin
            .as_ref()
            .is_some_and(ResourceLocator::is_theme_resource)
    }
}

/// Identity of a resource set merged into a [`ResourceChain`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ResourceSetId(u64);

/// Ordered list of merged resource sets. Lookups resolve against the most
/// recently merged set first.
#[derive(Debug, Default)]
pub struct ResourceChain {
    merged: Vec<(ResourceSetId, ResourceSet)>,
    next_id: u64,
}

impl ResourceChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, set: ResourceSet) -> ResourceSetId {
        let id = ResourceSetId(self.next_id);
        self.next_id += 1;
        self.merged.push((id, set));
        id
    }

    pub fn remove(&mut self, id: ResourceSetId) -> Option<ResourceSet> {
        let pos = self.merged.iter().position(|(candidate, _)| *candidate == id)?;
        Some(self.merged.remove(pos).1)
    }

    #[must_use]
    pub fn get_set(&self, id: ResourceSetId) -> Option<&ResourceSet> {
        self.merged
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, set)| set)
    }

    /// First merged set whose origin lies under the theme directory.
    #[must_use]
    pub fn find_theme(&self) -> Option<ResourceSetId> {
        self.merged
            .iter()
            .find(|(_, set)| set.is_theme())
            .map(|(id, _)| *id)
    }

    #[must_use]
    pub fn theme_count(&self) -> usize {
        self.merged.iter().filter(|(_, set)| set.is_theme()).count()
    }

    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<&ResourceValue> {
        self.merged.iter().rev().find_map(|(_, set)| set.get(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.merged.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merged.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceSet> {
        self.merged.iter().map(|(_, set)| set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme_set(path: &str, key: &str, color: Color) -> ResourceSet {
        ResourceSet::with_entries(
            Some(ResourceLocator::new(path)),
            [(key.to_string(), ResourceValue::Color(color))],
        )
    }

    #[test]
    fn lookup_prefers_latest_merge() {
        let mut chain = ResourceChain::new();
        chain.merge(theme_set("styles/base.toml", "Accent", Color::rgb(1, 1, 1)));
        chain.merge(theme_set("themes/default.toml", "Accent", Color::rgb(2, 2, 2)));

        assert_eq!(
            chain.lookup("Accent").and_then(ResourceValue::as_color),
            Some(Color::rgb(2, 2, 2))
        );
    }

    #[test]
    fn remove_is_by_identity() {
        let mut chain = ResourceChain::new();
        let a = chain.merge(theme_set("themes/default.toml", "Accent", Color::rgb(1, 1, 1)));
        let b = chain.merge(theme_set("themes/default.toml", "Accent", Color::rgb(1, 1, 1)));

        assert!(chain.remove(a).is_some());
        assert!(chain.remove(a).is_none());
        assert!(chain.get_set(b).is_some());
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn find_theme_returns_first_match_regardless_of_position() {
        let mut chain = ResourceChain::new();
        chain.merge(ResourceSet::new(None));
        chain.merge(theme_set("styles/base.toml", "Accent", Color::rgb(1, 1, 1)));
        let first = chain.merge(theme_set("themes/a.toml", "Accent", Color::rgb(1, 1, 1)));
        chain.merge(theme_set("themes/b.toml", "Accent", Color::rgb(1, 1, 1)));

        assert_eq!(chain.find_theme(), Some(first));
        assert_eq!(chain.theme_count(), 2);
    }
}
