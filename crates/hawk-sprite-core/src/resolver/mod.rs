//! Runtime icon resolution: maps free-form keys (damage causes, statistics,
//! enchantments) to a name present in the icon index.
//!
//! Resolution walks an ordered chain of strategies: curated table, association
//! cache, fuzzy search over the index, placeholder. It never fails; a key with
//! no derivable icon gets the placeholder.
//!
//! ```
//! use hawk_sprite_core::prelude::*;
//!
//! let index = IconIndex::new(vec!["entity-zombie".into(), "entity-zombie-small".into()]);
//! let resolver = IconResolver::new(index, CuratedTable::new(), MemoryCache::new());
//! assert_eq!(resolver.resolve("ZOMBIE", Tier::Small), "entity-zombie-small");
//! ```

use std::fmt;

use tracing::debug;

use crate::index::IconIndex;
use crate::model::Tier;

pub mod cache;
pub mod tables;

pub use cache::{AssociationCache, MemoryCache};
pub use tables::{CuratedTable, PLACEHOLDER_ICON};

/// Key components never used for substring matching on their own.
const GENERIC_COMPONENTS: [&str; 3] = ["block", "item", "entity"];

const NAMESPACE_MARKERS: [&str; 2] = ["minecraft:", "minecraft."];

/// Key normalized for the curated table: lowercase, spaces and hyphens as underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableKey(String);

impl TableKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase().replace([' ', '-'], "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Key normalized for index matching: lowercase, hyphen-separated, without
/// the `minecraft:` / `minecraft.` namespace marker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey(String);

impl IndexKey {
    pub fn new(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let bare = NAMESPACE_MARKERS
            .iter()
            .find_map(|m| lower.strip_prefix(m))
            .unwrap_or(&lower);
        Self(bare.replace([' ', '_'], "-"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphen-delimited components worth matching on their own.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0
            .split('-')
            .filter(|c| !c.is_empty() && !GENERIC_COMPONENTS.contains(c))
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One step of the resolution chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Curated,
    Cached,
    Fuzzy,
    Placeholder,
}

pub const RESOLUTION_CHAIN: [Strategy; 4] = [
    Strategy::Curated,
    Strategy::Cached,
    Strategy::Fuzzy,
    Strategy::Placeholder,
];

/// Resolved icon and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub icon: String,
    pub via: Strategy,
}

pub struct IconResolver<C: AssociationCache = MemoryCache> {
    index: IconIndex,
    curated: CuratedTable,
    cache: C,
    placeholder: String,
}

impl<C: AssociationCache> IconResolver<C> {
    pub fn new(index: IconIndex, curated: CuratedTable, cache: C) -> Self {
        Self {
            index,
            curated,
            cache,
            placeholder: PLACEHOLDER_ICON.to_string(),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn index(&self) -> &IconIndex {
        &self.index
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Icon name for `key`, with the suffix of `tier` appended.
    ///
    /// The suffixed name is not checked against the index. Keys curated as
    /// having no icon resolve to an empty string.
    pub fn resolve(&self, key: &str, tier: Tier) -> String {
        self.resolve_detailed(key, tier).icon
    }

    pub fn resolve_detailed(&self, key: &str, tier: Tier) -> Resolution {
        let table_key = TableKey::new(key);
        let index_key = IndexKey::new(key);
        let (icon, via) = RESOLUTION_CHAIN
            .iter()
            .find_map(|&via| {
                self.attempt(via, &table_key, &index_key)
                    .map(|icon| (icon, via))
            })
            .unwrap_or_else(|| (self.placeholder.clone(), Strategy::Placeholder));
        if matches!(via, Strategy::Fuzzy | Strategy::Placeholder) {
            self.cache.put(index_key.as_str(), &icon);
        }
        debug!(key, %index_key, ?via, %icon, "icon resolved");
        // An empty curated icon means "no icon" and takes no tier suffix.
        let icon = if icon.is_empty() { icon } else { tier.apply(&icon) };
        Resolution { icon, via }
    }

    fn attempt(&self, via: Strategy, table_key: &TableKey, index_key: &IndexKey) -> Option<String> {
        match via {
            Strategy::Curated => self.curated.get(table_key).map(str::to_string),
            Strategy::Cached => self.cache.get(index_key.as_str()),
            Strategy::Fuzzy => self.fuzzy(index_key).map(str::to_string),
            Strategy::Placeholder => Some(self.placeholder.clone()),
        }
    }

    /// Closest untiered index name sharing the key or one of its components
    /// as a substring. Ties keep the earliest name in index order.
    pub fn fuzzy(&self, key: &IndexKey) -> Option<&str> {
        if key.as_str().is_empty() {
            return None;
        }
        let components: Vec<&str> = key.components().collect();
        let mut best: Option<(&str, usize)> = None;
        for name in self.index.iter() {
            if Tier::split(name).1 != Tier::Normal {
                continue;
            }
            let candidate =
                name.contains(key.as_str()) || components.iter().any(|c| name.contains(c));
            if !candidate {
                continue;
            }
            let distance = levenshtein(name, key.as_str());
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((name, distance));
            }
        }
        best.map(|(name, _)| name)
    }
}

/// Edit distance (insertions, deletions, substitutions) between two strings, by char.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0usize; b.len() + 1];
    for (i, ca) in a.chars().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != *cb);
            cur[j + 1] = substitution.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
        assert_eq!(levenshtein("été", "ete"), 2);
    }

    #[test]
    fn keys_normalize_per_lookup_stage() {
        assert_eq!(TableKey::new("Cave Spider").as_str(), "cave_spider");
        assert_eq!(TableKey::new("cave-spider").as_str(), "cave_spider");
        assert_eq!(IndexKey::new("minecraft.walk_one_cm").as_str(), "walk-one-cm");
        assert_eq!(IndexKey::new("minecraft:Iron Sword").as_str(), "iron-sword");
        assert_eq!(IndexKey::new("block.minecraft.stone").as_str(), "block.minecraft.stone");
    }

    #[test]
    fn generic_components_are_ignored() {
        let key = IndexKey::new("block_of_item");
        assert_eq!(key.components().collect::<Vec<_>>(), vec!["of"]);
    }
}
