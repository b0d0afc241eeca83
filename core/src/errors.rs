//! Error types for dictionary loading and persistence.

use std::path::PathBuf;

/// Result type defaulting to [`DictionaryError`].
pub type Result<T, E = DictionaryError> = std::result::Result<T, E>;

/// Failure reading or persisting dictionary data.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// A dictionary or snapshot file could not be opened, read or written.
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot could not be encoded or decoded.
    #[error(transparent)]
    Snapshot(#[from] bincode::Error),
}

impl DictionaryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DictionaryError::Io {
            path: path.into(),
            source,
        }
    }
}
