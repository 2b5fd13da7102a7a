//! Error types for catalog loading, persistence and the progress actor

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the fallible edges of the engine.
///
/// Progress mutations themselves never fail; only catalog parsing,
/// snapshot persistence and the actor channel can.
#[derive(Debug, Error)]
pub enum AscendError {
    /// Catalog file could not be read
    #[error("Failed to read catalog from {path:?}: {source}")]
    CatalogIo {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Catalog is structurally invalid
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The progress actor has shut down
    #[error("Progress actor is no longer running")]
    ActorClosed,
}

impl AscendError {
    /// Check if this error came from bad catalog data rather than the environment
    pub fn is_catalog_error(&self) -> bool {
        matches!(self, AscendError::InvalidCatalog(_) | AscendError::CatalogIo { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_catalog_is_catalog_error() {
        let err = AscendError::InvalidCatalog("no weeks".into());
        assert!(err.is_catalog_error());
        assert_eq!(err.to_string(), "Invalid catalog: no weeks");
    }

    #[test]
    fn actor_closed_is_not_catalog_error() {
        assert!(!AscendError::ActorClosed.is_catalog_error());
    }
}
