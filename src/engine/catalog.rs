//! Priority-resolved index of type shapes across the source directories.

use crate::domain::{EngineError, TypeDescriptor};
use crate::engine::extractor::ShapeExtract;
use crate::engine::scanner;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// An immutable snapshot of the name → descriptor index.
///
/// Catalogs are never mutated after construction; a rebuild produces a brand
/// new snapshot that atomically replaces the old one, so readers observe
/// either the old or the new index, never an intermediate state.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeCatalog {
    /// Builds a catalog from an ordered list of directories, index 0 highest
    /// priority. When two directories define the same type name, the earlier
    /// directory wins and the later occurrence is discarded, never merged.
    ///
    /// A file that cannot be read or extracted is skipped with a warning; a
    /// single bad file must not abort the whole build. The build touches no
    /// previously published catalog, so it is idempotent and side-effect-free.
    pub fn build(directories: &[PathBuf], extractor: &dyn ShapeExtract) -> Self {
        let mut types: HashMap<String, Arc<TypeDescriptor>> = HashMap::new();
        for dir in directories {
            for file in scanner::scan(dir) {
                let content = match std::fs::read_to_string(&file) {
                    Ok(content) => content,
                    Err(err) => {
                        warn!(
                            "{}",
                            EngineError::ExtractionSkipped {
                                path: file,
                                reason: err.to_string(),
                            }
                        );
                        continue;
                    }
                };
                for shape in extractor.extract(&content) {
                    if types.contains_key(&shape.name) {
                        debug!(
                            "Discarding lower-priority definition of '{}' from {}",
                            shape.name,
                            file.display()
                        );
                        continue;
                    }
                    types.insert(
                        shape.name.clone(),
                        Arc::new(TypeDescriptor {
                            name: shape.name,
                            source_file: file.clone(),
                            fields: shape.fields,
                        }),
                    );
                }
            }
        }
        Self { types }
    }

    /// Pure read; an empty name misses like any other absent name.
    pub fn lookup(&self, name: &str) -> Option<Arc<TypeDescriptor>> {
        self.types.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All descriptors, for operator inspection.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.types.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::extractor::InterfaceExtractor;
    use std::fs;
    use tempfile::TempDir;

    fn build(dirs: &[PathBuf]) -> TypeCatalog {
        TypeCatalog::build(dirs, &InterfaceExtractor::new())
    }

    #[test]
    fn test_first_directory_wins_on_collision() -> anyhow::Result<()> {
        let dir_a = TempDir::new()?;
        let dir_b = TempDir::new()?;
        fs::write(
            dir_a.path().join("user.ts"),
            "export interface User { id: number }",
        )?;
        fs::write(
            dir_b.path().join("user.ts"),
            "export interface User { id: number; email: string }",
        )?;

        let catalog = build(&[dir_a.path().to_path_buf(), dir_b.path().to_path_buf()]);
        let desc = catalog.lookup("User").unwrap();
        assert!(desc.source_file.starts_with(dir_a.path()));
        assert_eq!(desc.fields.len(), 1);

        // Priority is purely positional: reversing the order flips the winner.
        let catalog = build(&[dir_b.path().to_path_buf(), dir_a.path().to_path_buf()]);
        let desc = catalog.lookup("User").unwrap();
        assert!(desc.source_file.starts_with(dir_b.path()));
        assert_eq!(desc.fields.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_directory_builds_empty() {
        let catalog = build(&[PathBuf::from("/no/such/dir")]);
        assert!(catalog.is_empty());
        assert!(catalog.lookup("User").is_none());
    }

    #[test]
    fn test_empty_name_misses() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("user.ts"),
            "export interface User { id: number }",
        )?;
        let catalog = build(&[dir.path().to_path_buf()]);
        assert!(catalog.lookup("").is_none());
        Ok(())
    }

    #[test]
    fn test_rebuild_unmasks_lower_priority_duplicate() -> anyhow::Result<()> {
        let dir_a = TempDir::new()?;
        let dir_b = TempDir::new()?;
        let shadowing = dir_a.path().join("user.ts");
        fs::write(&shadowing, "export interface User { id: number }")?;
        fs::write(
            dir_b.path().join("user.ts"),
            "export interface User { id: number; email: string }",
        )?;
        let dirs = [dir_a.path().to_path_buf(), dir_b.path().to_path_buf()];

        let catalog = build(&dirs);
        assert_eq!(catalog.lookup("User").unwrap().fields.len(), 1);

        // Removing the shadowing file and doing a full rescan surfaces the
        // lower-priority definition; an incremental patch would have lost it.
        fs::remove_file(&shadowing)?;
        let catalog = build(&dirs);
        let desc = catalog.lookup("User").unwrap();
        assert!(desc.source_file.starts_with(dir_b.path()));
        assert_eq!(desc.fields.len(), 2);
        Ok(())
    }
}
