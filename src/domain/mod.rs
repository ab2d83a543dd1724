//! Core domain types shared by the resolution and routing engine.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{EngineError, EngineResult};

/// Declared kind of an interface field, as classified by the shape extractor.
///
/// The classification is deliberately coarse: anything that is not a
/// recognizable primitive or array pattern degrades to `String` (the most
/// conservative representable kind), and inline composites or references to
/// other named types degrade to `Object`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    /// A `Date`-typed field; rendered as an RFC 3339 string in generated data.
    Date,
    /// Inline object literal or a reference to another named type.
    Object,
}

/// One field of an extracted type shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
    /// Marked with `?` or unioned with `null`/`undefined` in the source.
    pub optional: bool,
    /// `X[]` or `Array<X>`; `kind` then holds the element kind.
    pub is_array: bool,
}

/// A named type shape tied to the file it was extracted from.
///
/// Descriptors are immutable once built; a catalog rebuild replaces them
/// wholesale, never mutates them in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub source_file: PathBuf,
    pub fields: Vec<FieldDescriptor>,
}

/// A shape as produced by the extractor, before it is bound to a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Per-request resolution result. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMapping {
    pub type_name: String,
    pub is_array: bool,
}

/// Filesystem change notification consumed by the watch coordinator.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    Added(PathBuf),
    Changed(PathBuf),
    Removed(PathBuf),
    Error(String),
}
