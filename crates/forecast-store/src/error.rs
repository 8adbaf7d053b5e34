//! Error types for store access.

use hydro_common::HydroError;
use thiserror::Error;

/// Errors that can occur while reading forecast stores.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The dataset, region or reach does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Failed to open an existing array.
    #[error("failed to open array: {0}")]
    OpenFailed(String),

    /// Failed to read data from an open array.
    #[error("failed to read array data: {0}")]
    ReadFailed(String),

    /// Attributes disagree with the array shape, or are missing.
    #[error("invalid array metadata: {0}")]
    InvalidMetadata(String),

    /// Storage/IO error.
    #[error("storage error: {0}")]
    StorageError(String),
}

impl StoreError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }

    pub fn read_failed(msg: impl Into<String>) -> Self {
        Self::ReadFailed(msg.into())
    }

    pub fn invalid_metadata(msg: impl Into<String>) -> Self {
        Self::InvalidMetadata(msg.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidMetadata(err.to_string())
    }
}

impl From<StoreError> for HydroError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => HydroError::NotFound(msg),
            StoreError::InvalidMetadata(_) => HydroError::DataIntegrity(err.to_string()),
            StoreError::OpenFailed(_) | StoreError::ReadFailed(_) | StoreError::StorageError(_) => {
                HydroError::Storage(err.to_string())
            }
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
