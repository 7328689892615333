//! Catalog loading error types.

use std::path::PathBuf;

use crate::domain::{InvalidStation, StationId};

/// Errors that can occur when loading a station catalog.
#[derive(Debug, thiserror::Error)]
pub enum StationError {
    /// Snapshot file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot is not valid JSON, or a record has the wrong shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A record violates a field invariant
    #[error(transparent)]
    Invalid(#[from] InvalidStation),

    /// Two records share an id
    #[error("duplicate station id: {id}")]
    Duplicate { id: StationId },
}

impl From<serde_json::Error> for StationError {
    fn from(err: serde_json::Error) -> Self {
        StationError::Json {
            message: err.to_string(),
        }
    }
}
