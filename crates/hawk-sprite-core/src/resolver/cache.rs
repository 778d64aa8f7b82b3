use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

/// Normalized key → icon associations learned at runtime.
///
/// Append-only: `put` on an existing key keeps the first value. Two callers
/// racing on the same unseen key compute the same icon, so losing the race is
/// harmless.
pub trait AssociationCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, icon: &str);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C: AssociationCache + ?Sized> AssociationCache for Arc<C> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
    fn put(&self, key: &str, icon: &str) {
        (**self).put(key, icon)
    }
    fn len(&self) -> usize {
        (**self).len()
    }
}

/// In-memory cache shared by every request handler of the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-filled with `entries` (keys already hyphen-normalized).
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Cache pre-filled with the built-in synonyms the fuzzy search cannot derive.
    pub fn seeded() -> Self {
        Self::with_entries(super::tables::SEEDED_ASSOCIATIONS.iter().copied())
    }

    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries.read().clone()
    }
}

impl AssociationCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, icon: &str) {
        self.entries
            .write()
            .entry(key.to_string())
            .or_insert_with(|| icon.to_string());
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_never_overwrites() {
        let cache = MemoryCache::new();
        cache.put("fall", "block-stone");
        cache.put("fall", "block-sand");
        assert_eq!(cache.get("fall").as_deref(), Some("block-stone"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn shared_cache_sees_writes_from_threads() {
        let cache = Arc::new(MemoryCache::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.put("same-key", "entity-zombie");
                    cache.put(&format!("key-{i}"), "entity-skeleton");
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread");
        }
        assert_eq!(cache.len(), 5);
        assert_eq!(cache.get("same-key").as_deref(), Some("entity-zombie"));
    }
}
