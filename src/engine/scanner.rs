//! Walks a source directory tree for candidate definition files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into. Build output, dependency trees and
/// VCS metadata can contain thousands of `.ts` files that are not ours.
const DENYLIST: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "coverage",
    "target",
    ".next",
    "out",
];

fn is_denied(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| DENYLIST.contains(&name))
            .unwrap_or(false)
}

fn is_definition_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("ts") | Some("tsx")
    )
}

/// Yields every candidate definition file under `root`, recursively.
///
/// A non-existent root produces an empty iterator: a directory that has not
/// been created yet is a valid, empty source. Unreadable entries are skipped
/// with a debug log rather than aborting the walk.
pub fn scan(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_denied(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::debug!("Skipping unreadable entry during scan: {}", err);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_definition_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_recurses_and_filters_extensions() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        fs::create_dir_all(root.join("models/nested"))?;
        fs::write(root.join("models/user.ts"), "export interface User {}")?;
        fs::write(root.join("models/nested/order.tsx"), "")?;
        fs::write(root.join("models/readme.md"), "not a definition")?;
        fs::write(root.join("models/data.json"), "{}")?;

        let mut found: Vec<_> = scan(root).collect();
        found.sort();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("models/nested/order.tsx"));
        assert!(found[1].ends_with("models/user.ts"));
        Ok(())
    }

    #[test]
    fn test_scan_skips_denylisted_directories() -> anyhow::Result<()> {
        let temp = TempDir::new()?;
        let root = temp.path();
        fs::create_dir_all(root.join("node_modules/lib"))?;
        fs::create_dir_all(root.join("dist"))?;
        fs::write(root.join("node_modules/lib/vendor.ts"), "")?;
        fs::write(root.join("dist/bundle.ts"), "")?;
        fs::write(root.join("app.ts"), "")?;

        let found: Vec<_> = scan(root).collect();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("app.ts"));
        Ok(())
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let found: Vec<_> = scan(Path::new("/definitely/not/a/real/dir")).collect();
        assert!(found.is_empty());
    }
}
