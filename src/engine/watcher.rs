//! Bridges filesystem notifications into the engine's serialized rebuild path.

use crate::domain::WatchEvent;
use crate::engine::MockEngine;
use anyhow::Result;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Owns the OS watcher; dropping it stops event delivery.
///
/// Raw notifications are pushed onto an unbounded channel and drained by a
/// single task, so rebuild/invalidation sequences are serialized by
/// construction no matter how bursty the watcher backend is. Bursts are not
/// debounced: each event triggers its own rebuild, which is idempotent and
/// read-only on disk, so the extra work is waste but never a correctness
/// problem.
pub struct SourceWatcher {
    _watcher: RecommendedWatcher,
}

impl SourceWatcher {
    pub fn spawn(engine: Arc<MockEngine>) -> Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: notify::Result<Event>| {
                for event in translate(result) {
                    let _ = tx.send(event);
                }
            },
            Config::default(),
        )?;

        for dir in engine.directories() {
            if dir.exists() {
                watcher.watch(dir, RecursiveMode::Recursive)?;
                info!("Watching source directory: {}", dir.display());
            } else {
                warn!(
                    "Source directory does not exist yet, not watching: {}",
                    dir.display()
                );
            }
        }

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                engine.apply_event(event).await;
            }
        });

        Ok(Self { _watcher: watcher })
    }
}

/// Maps a raw notification into engine-facing events, one per affected path.
/// Access-only notifications carry no catalog-affecting information and are
/// dropped here.
fn translate(result: notify::Result<Event>) -> Vec<WatchEvent> {
    match result {
        Ok(event) => {
            let variant: fn(std::path::PathBuf) -> WatchEvent = match event.kind {
                EventKind::Create(_) => WatchEvent::Added,
                EventKind::Modify(_) => WatchEvent::Changed,
                EventKind::Remove(_) => WatchEvent::Removed,
                EventKind::Access(_) => return Vec::new(),
                _ => WatchEvent::Changed,
            };
            event.paths.into_iter().map(variant).collect()
        }
        Err(err) => vec![WatchEvent::Error(err.to_string())],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind, RemoveKind};
    use std::path::PathBuf;

    fn event(kind: EventKind, path: &str) -> notify::Result<Event> {
        let mut event = Event::new(kind);
        event.paths.push(PathBuf::from(path));
        Ok(event)
    }

    #[test]
    fn test_translate_create_modify_remove() {
        let added = translate(event(EventKind::Create(CreateKind::File), "/s/a.ts"));
        assert!(matches!(&added[0], WatchEvent::Added(p) if p.ends_with("a.ts")));

        let changed = translate(event(EventKind::Modify(ModifyKind::Any), "/s/a.ts"));
        assert!(matches!(&changed[0], WatchEvent::Changed(_)));

        let removed = translate(event(EventKind::Remove(RemoveKind::File), "/s/a.ts"));
        assert!(matches!(&removed[0], WatchEvent::Removed(_)));
    }

    #[test]
    fn test_translate_drops_access_events() {
        let events = translate(event(EventKind::Access(AccessKind::Any), "/s/a.ts"));
        assert!(events.is_empty());
    }

    #[test]
    fn test_translate_error() {
        let events = translate(Err(notify::Error::generic("backend gone")));
        assert!(matches!(&events[0], WatchEvent::Error(detail) if detail.contains("backend gone")));
    }
}
