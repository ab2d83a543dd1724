//! Memoizes generated singular payloads until their source file changes.

use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Cache key: same-named types in different files (possible transiently
/// during a rebuild race) must not collide, so the source file is part of
/// the key.
type CacheKey = (String, PathBuf);

struct CacheEntry {
    payload: Value,
    created_at: Instant,
}

/// Concurrently-safe payload cache.
///
/// Only singular responses are ever stored here: a "get one" endpoint should
/// behave like a stable resource when polled, while list endpoints are
/// expected to show variety across calls, so array responses are regenerated
/// every time and no TTL policy is needed.
#[derive(Clone)]
pub struct SchemaCache {
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
    enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub count: usize,
    pub entries: Vec<CacheEntryStats>,
}

#[derive(Debug, Serialize)]
pub struct CacheEntryStats {
    pub type_name: String,
    pub source_file: PathBuf,
    pub age_seconds: u64,
}

impl SchemaCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    pub async fn get(&self, type_name: &str, source_file: &Path) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(&(type_name.to_string(), source_file.to_path_buf()))
            .map(|entry| entry.payload.clone())
    }

    pub async fn set(&self, type_name: &str, source_file: &Path, payload: Value) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.insert(
            (type_name.to_string(), source_file.to_path_buf()),
            CacheEntry {
                payload,
                created_at: Instant::now(),
            },
        );
    }

    /// Drops every entry extracted from `source_file`, leaving others intact.
    pub async fn invalidate_file(&self, source_file: &Path) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|(_, file), _| file != source_file);
    }

    pub async fn clear(&self) {
        if !self.enabled {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Reports size and per-entry age; still answers when disabled.
    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        CacheStats {
            enabled: self.enabled,
            count: entries.len(),
            entries: entries
                .iter()
                .map(|((type_name, source_file), entry)| CacheEntryStats {
                    type_name: type_name.clone(),
                    source_file: source_file.clone(),
                    age_seconds: entry.created_at.elapsed().as_secs(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = SchemaCache::new(true);
        let file = PathBuf::from("/src/user.ts");
        assert!(cache.get("User", &file).await.is_none());

        cache.set("User", &file, json!({"id": 1})).await;
        assert_eq!(cache.get("User", &file).await, Some(json!({"id": 1})));
    }

    #[tokio::test]
    async fn test_key_includes_source_file() {
        let cache = SchemaCache::new(true);
        let file_a = PathBuf::from("/a/user.ts");
        let file_b = PathBuf::from("/b/user.ts");
        cache.set("User", &file_a, json!({"from": "a"})).await;
        cache.set("User", &file_b, json!({"from": "b"})).await;

        assert_eq!(cache.get("User", &file_a).await, Some(json!({"from": "a"})));
        assert_eq!(cache.get("User", &file_b).await, Some(json!({"from": "b"})));
    }

    #[tokio::test]
    async fn test_invalidate_file_is_targeted() {
        let cache = SchemaCache::new(true);
        let file_a = PathBuf::from("/a/user.ts");
        let file_b = PathBuf::from("/b/order.ts");
        cache.set("User", &file_a, json!(1)).await;
        cache.set("Account", &file_a, json!(2)).await;
        cache.set("Order", &file_b, json!(3)).await;

        cache.invalidate_file(&file_a).await;
        assert!(cache.get("User", &file_a).await.is_none());
        assert!(cache.get("Account", &file_a).await.is_none());
        assert_eq!(cache.get("Order", &file_b).await, Some(json!(3)));
    }

    #[tokio::test]
    async fn test_disabled_cache_noops_but_reports_stats() {
        let cache = SchemaCache::new(false);
        let file = PathBuf::from("/src/user.ts");
        cache.set("User", &file, json!(1)).await;
        assert!(cache.get("User", &file).await.is_none());

        let stats = cache.stats().await;
        assert!(!stats.enabled);
        assert_eq!(stats.count, 0);
    }

    #[tokio::test]
    async fn test_clear_and_stats() {
        let cache = SchemaCache::new(true);
        let file = PathBuf::from("/src/user.ts");
        cache.set("User", &file, json!(1)).await;

        let stats = cache.stats().await;
        assert!(stats.enabled);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.entries[0].type_name, "User");

        cache.clear().await;
        assert_eq!(cache.stats().await.count, 0);
    }
}
