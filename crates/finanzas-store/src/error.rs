//! Error types for finanzas-store

use finanzas_core::CoreError;
use thiserror::Error;

/// Storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid user id: {user:?} (letters, digits, '-' and '_' only)")]
    InvalidUser { user: String },
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::StoreError {
            message: err.to_string(),
        }
    }
}

/// Result type with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
