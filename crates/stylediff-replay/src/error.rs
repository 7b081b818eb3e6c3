/// Errors produced while applying commands to a style document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("unknown layer: {0}")]
    UnknownLayer(String),

    #[error("layer already exists: {0}")]
    DuplicateLayer(String),

    #[error("unknown source: {0}")]
    UnknownSource(String),

    #[error("source already exists: {0}")]
    DuplicateSource(String),

    #[error("unknown import: {0}")]
    UnknownImport(String),

    #[error("import already exists: {0}")]
    DuplicateImport(String),

    #[error("{0} is not a JSON object")]
    NotAnObject(&'static str),

    #[error("{0} is not a JSON array")]
    NotAnArray(&'static str),

    #[error("{0} has no string id")]
    MissingId(&'static str),
}

/// Convenience alias for replay results.
pub type ReplayResult<T> = Result<T, ReplayError>;
