//! In-process query result cache with prefix invalidation.
//!
//! Keys are hierarchical (`["media", blog_id]`). Invalidating `["media"]`
//! drops every entry below it; entries are never patched in place.
//!
//! Every invalidation bumps a generation counter. A fetch records the
//! generation before it starts and stores its result with
//! [`QueryCache::insert_if_current`], so a result read before an invalidation
//! is never written back after it.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

/// Hierarchical cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Root key for all media queries
    pub fn media_root() -> Self {
        Self::new(["media"])
    }

    /// Media list of one blog
    pub fn media(blog_id: &str) -> Self {
        Self::new(["media", blog_id])
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

#[derive(Debug)]
struct Entries<V> {
    map: HashMap<QueryKey, V>,
    generation: u64,
}

/// Cache of query results
#[derive(Debug)]
pub struct QueryCache<V> {
    entries: RwLock<Entries<V>>,
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                map: HashMap::new(),
                generation: 0,
            }),
        }
    }

    pub async fn get(&self, key: &QueryKey) -> Option<V> {
        self.entries.read().await.map.get(key).cloned()
    }

    /// Current generation; changes on every invalidation
    pub async fn generation(&self) -> u64 {
        self.entries.read().await.generation
    }

    pub async fn insert(&self, key: QueryKey, value: V) {
        self.entries.write().await.map.insert(key, value);
    }

    /// Store `value` only if nothing was invalidated since `generation`
    pub async fn insert_if_current(&self, key: QueryKey, value: V, generation: u64) -> bool {
        let mut entries = self.entries.write().await;
        if entries.generation != generation {
            debug!(%key, "Discarding result fetched before invalidation");
            return false;
        }
        entries.map.insert(key, value);
        true
    }

    /// Drop every entry under `prefix`; returns how many were dropped
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        entries.generation += 1;
        let before = entries.map.len();
        entries.map.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - entries.map.len();
        debug!(key = %prefix, dropped, "Invalidated queries");
        dropped
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_prefix() {
        let key = QueryKey::media("blog-1");
        assert!(key.starts_with(&QueryKey::media_root()));
        assert!(key.starts_with(&key));
        assert!(!QueryKey::media_root().starts_with(&key));
        assert!(!QueryKey::new(["posts", "blog-1"]).starts_with(&QueryKey::media_root()));
        assert_eq!(key.to_string(), "[media, blog-1]");
    }

    #[tokio::test]
    async fn test_invalidate_by_prefix() {
        let cache: QueryCache<u32> = QueryCache::new();
        cache.insert(QueryKey::media("a"), 1).await;
        cache.insert(QueryKey::media("b"), 2).await;
        cache.insert(QueryKey::new(["posts", "a"]), 3).await;

        assert_eq!(cache.invalidate(&QueryKey::media_root()).await, 2);
        assert!(cache.get(&QueryKey::media("a")).await.is_none());
        assert_eq!(cache.get(&QueryKey::new(["posts", "a"])).await, Some(3));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_insert_skipped_after_invalidation() {
        let cache: QueryCache<u32> = QueryCache::new();

        let generation = cache.generation().await;
        cache.invalidate(&QueryKey::media_root()).await;
        assert!(!cache.insert_if_current(QueryKey::media("a"), 1, generation).await);
        assert!(cache.is_empty().await);

        let generation = cache.generation().await;
        assert!(cache.insert_if_current(QueryKey::media("a"), 2, generation).await);
        assert_eq!(cache.get(&QueryKey::media("a")).await, Some(2));
    }
}
