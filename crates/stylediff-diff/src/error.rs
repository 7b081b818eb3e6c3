//! Error types for the diff crate.

use stylediff_types::TypeError;

/// Errors that abort a diff and trigger the `setStyle` fallback.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The document does not have the shape the differ relies on.
    #[error("malformed style: {0}")]
    Malformed(#[from] TypeError),

    /// A layer id was expected in one of the layer indexes but is missing.
    #[error("layer not found during diff: {0}")]
    MissingLayer(String),

    /// The simulated layer order no longer matches the emitted commands.
    #[error("layer order tracker out of sync at {0}")]
    TrackerDesync(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
