//! Errors raised while loading static tables.

use thiserror::Error;

/// Errors that can occur while loading the catalog or a rule table.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON for the expected shape.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter name outside the known set.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// A level outside low/medium/high.
    #[error("unknown level: {0}")]
    UnknownLevel(String),

    /// An intent label outside the known set.
    #[error("unknown intent: {0}")]
    UnknownIntent(String),

    /// A keyword or pattern that does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The catalog has no architectures.
    #[error("architecture catalog is empty")]
    EmptyCatalog,

    /// Two architectures share a name.
    #[error("duplicate architecture: {0}")]
    DuplicateArchitecture(String),

    /// An architecture rates no parameters.
    #[error("architecture {0} rates no parameters")]
    EmptyProfile(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Read a data file into a string.
pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })
}
