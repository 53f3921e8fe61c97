//! Error types for catalog ingestion.

use std::path::PathBuf;

use thiserror::Error;

use super::model::Gender;

/// Fatal ingestion failure. There is no partial-load mode: if either source
/// cannot be read, no catalog is produced.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// A required source file could not be opened, read or decoded.
    #[error("{which} catalog source '{path}' could not be loaded: {reason}")]
    MissingSource {
        which: Gender,
        path: PathBuf,
        reason: String,
    },
}

impl IngestionError {
    /// Which source failed.
    pub fn which(&self) -> Gender {
        match self {
            IngestionError::MissingSource { which, .. } => *which,
        }
    }
}
