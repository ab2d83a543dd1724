//! Type resolution and routing engine.
//!
//! The engine owns the two pieces of process-wide shared state — the type
//! catalog and the schema cache — as an explicitly constructed instance that
//! is handed to the serving layer, so tests can run several independent
//! engines side by side.

pub mod cache;
pub mod catalog;
pub mod extractor;
pub mod gate;
pub mod inflection;
pub mod resolver;
pub mod scanner;
pub mod watcher;

use crate::domain::WatchEvent;
use cache::SchemaCache;
use catalog::TypeCatalog;
use extractor::ShapeExtract;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

pub struct MockEngine {
    directories: Vec<PathBuf>,
    extractor: Arc<dyn ShapeExtract>,
    catalog: RwLock<Arc<TypeCatalog>>,
    cache: SchemaCache,
}

impl MockEngine {
    /// Builds the initial catalog synchronously; startup wants the full index
    /// before the first request lands.
    ///
    /// Roots are canonicalized up front: cache invalidation compares event
    /// paths byte-for-byte against descriptor source files, and some notify
    /// backends (FSEvents) report canonicalized paths even when the watched
    /// root was spelled through a symlink. A root that cannot be
    /// canonicalized (not created yet) is kept as given.
    pub fn new(
        directories: Vec<PathBuf>,
        extractor: Arc<dyn ShapeExtract>,
        cache_enabled: bool,
    ) -> Self {
        let directories: Vec<PathBuf> = directories
            .into_iter()
            .map(|dir| dir.canonicalize().unwrap_or(dir))
            .collect();
        let catalog = TypeCatalog::build(&directories, extractor.as_ref());
        info!(
            "Cataloged {} type(s) from {} source director{}",
            catalog.len(),
            directories.len(),
            if directories.len() == 1 { "y" } else { "ies" }
        );
        Self {
            directories,
            extractor,
            catalog: RwLock::new(Arc::new(catalog)),
            cache: SchemaCache::new(cache_enabled),
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn cache(&self) -> &SchemaCache {
        &self.cache
    }

    /// Current catalog snapshot. The returned Arc stays fully consistent even
    /// if a rebuild publishes a replacement while the caller holds it.
    pub async fn snapshot(&self) -> Arc<TypeCatalog> {
        self.catalog.read().await.clone()
    }

    /// Full rescan of the original ordered directory list, built entirely off
    /// to the side and published with a single swap. Incremental patching is
    /// ruled out: editing or removing one file can unmask a lower-priority
    /// duplicate defined elsewhere, and only a full rescan keeps the
    /// first-wins invariant intact.
    pub async fn rebuild(&self) {
        let directories = self.directories.clone();
        let extractor = self.extractor.clone();
        let built =
            tokio::task::spawn_blocking(move || TypeCatalog::build(&directories, extractor.as_ref()))
                .await;
        match built {
            Ok(next) => {
                let count = next.len();
                *self.catalog.write().await = Arc::new(next);
                info!("Catalog rebuilt: {} type(s)", count);
            }
            Err(err) => error!("Catalog rebuild task failed: {}", err),
        }
    }

    /// Applies one filesystem event: invalidation first, then rebuild, so a
    /// request racing the rebuild can at worst regenerate a payload, never
    /// serve one for a stale shape. Events are consumed one at a time by the
    /// watch task, so rebuild sequences never interleave.
    pub async fn apply_event(&self, event: WatchEvent) {
        match event {
            WatchEvent::Added(path) => {
                info!("Source added: {}", path.display());
                // Nothing to invalidate: no cache entry can reference a file
                // that did not previously exist.
                self.rebuild().await;
            }
            WatchEvent::Changed(path) | WatchEvent::Removed(path) => {
                info!("Source changed or removed: {}", path.display());
                self.cache.invalidate_file(&path).await;
                self.rebuild().await;
            }
            WatchEvent::Error(detail) => {
                // Non-fatal: the previous catalog and cache stay in service.
                warn!("Watch error: {}", detail);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extractor::InterfaceExtractor;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn engine_for(dirs: Vec<PathBuf>) -> MockEngine {
        MockEngine::new(dirs, Arc::new(InterfaceExtractor::new()), true)
    }

    #[tokio::test]
    async fn test_changed_event_invalidates_and_rebuilds() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("user.ts");
        fs::write(&file, "export interface User { id: number }")?;

        let engine = engine_for(vec![dir.path().to_path_buf()]);
        let desc = engine.snapshot().await.lookup("User").unwrap();
        engine.cache.set("User", &desc.source_file, json!({"id": 1})).await;

        fs::write(&file, "export interface User { id: number; email: string }")?;
        engine.apply_event(WatchEvent::Changed(file.clone())).await;

        assert!(engine.cache.get("User", &file).await.is_none());
        let desc = engine.snapshot().await.lookup("User").unwrap();
        assert_eq!(desc.fields.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_removed_event_drops_type() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("user.ts");
        fs::write(&file, "export interface User { id: number }")?;

        let engine = engine_for(vec![dir.path().to_path_buf()]);
        assert!(engine.snapshot().await.lookup("User").is_some());

        fs::remove_file(&file)?;
        engine.apply_event(WatchEvent::Removed(file)).await;
        assert!(engine.snapshot().await.lookup("User").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_added_event_extends_catalog() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let engine = engine_for(vec![dir.path().to_path_buf()]);
        assert!(engine.snapshot().await.is_empty());

        let file = dir.path().join("order.ts");
        fs::write(&file, "export interface Order { id: number }")?;
        engine.apply_event(WatchEvent::Added(file)).await;
        assert!(engine.snapshot().await.lookup("Order").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_noncanonical_root_still_invalidates() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("user.ts"),
            "export interface User { id: number }",
        )?;

        // Same root, non-canonical spelling.
        let engine = engine_for(vec![dir.path().join(".")]);
        let desc = engine.snapshot().await.lookup("User").unwrap();
        engine.cache.set("User", &desc.source_file, json!(1)).await;

        // Watcher backends may report the canonical path.
        let reported = dir.path().canonicalize()?.join("user.ts");
        assert_eq!(desc.source_file, reported);
        engine.apply_event(WatchEvent::Changed(reported)).await;
        assert!(engine.cache.get("User", &desc.source_file).await.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_error_event_leaves_state_in_service() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("user.ts"),
            "export interface User { id: number }",
        )?;
        let engine = engine_for(vec![dir.path().to_path_buf()]);
        let desc = engine.snapshot().await.lookup("User").unwrap();
        engine.cache.set("User", &desc.source_file, json!(1)).await;

        engine
            .apply_event(WatchEvent::Error("queue overflow".into()))
            .await;
        assert!(engine.snapshot().await.lookup("User").is_some());
        assert!(engine.cache.get("User", &desc.source_file).await.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_snapshot_survives_rebuild() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("user.ts");
        fs::write(&file, "export interface User { id: number }")?;

        let engine = engine_for(vec![dir.path().to_path_buf()]);
        let before = engine.snapshot().await;

        fs::write(&file, "export interface User { id: number; email: string }")?;
        engine.rebuild().await;

        // The old snapshot is still fully consistent for readers that hold it.
        assert_eq!(before.lookup("User").unwrap().fields.len(), 1);
        assert_eq!(engine.snapshot().await.lookup("User").unwrap().fields.len(), 2);
        Ok(())
    }
}
