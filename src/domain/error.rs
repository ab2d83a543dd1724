//! Error types for the type resolution and routing engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the engine and its collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A configured source directory does not exist.
    ///
    /// The primary directory is auto-created at startup; a missing additional
    /// directory is a fatal startup condition.
    #[error("Source directory unavailable: {}", .0.display())]
    DirectoryUnavailable(PathBuf),

    /// A single file failed structural extraction. Absorbed at catalog build;
    /// never propagates past it.
    #[error("Skipped extraction for {}: {reason}", .path.display())]
    ExtractionSkipped { path: PathBuf, reason: String },

    /// The URL resolved to a name absent from the catalog.
    #[error("No type definition found for '{0}'")]
    TypeNotFound(String),

    /// The external generator failed for an otherwise-resolved type. The
    /// original cause is preserved, opaque and unretried.
    #[error("Mock generation failed for '{type_name}': {cause}")]
    MockGeneration {
        type_name: String,
        cause: anyhow::Error,
    },

    /// The single forwarding attempt to the upstream could not complete.
    #[error("Upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Malformed configuration input. Reported as a warning; the offending
    /// option is ignored, never a startup abort.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        EngineError::UpstreamUnreachable(err.to_string())
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
