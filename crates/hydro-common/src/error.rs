//! Error types for forecast operations.

use thiserror::Error;

/// Result type alias using HydroError.
pub type HydroResult<T> = Result<T, HydroError>;

/// Primary error type for forecast aggregation.
#[derive(Debug, Error)]
pub enum HydroError {
    /// Malformed input: date tokens, units, formats, missing parameters.
    #[error("{0}")]
    BadRequest(String),

    /// Unknown reach, missing forecast or record file.
    #[error("{0}")]
    NotFound(String),

    /// A store violates an invariant the engine relies on.
    #[error("data integrity error: {0}")]
    DataIntegrity(String),

    /// The array library failed to read an existing store.
    #[error("storage error: {0}")]
    Storage(String),

    /// A response body could not be encoded.
    #[error("encoding error: {0}")]
    Encoding(String),
}

impl HydroError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn data_integrity(msg: impl Into<String>) -> Self {
        Self::DataIntegrity(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            HydroError::BadRequest(_) => 422,
            HydroError::NotFound(_) => 404,
            HydroError::DataIntegrity(_) | HydroError::Storage(_) | HydroError::Encoding(_) => 500,
        }
    }

    /// True for errors caused by the caller rather than the data.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<std::io::Error> for HydroError {
    fn from(err: std::io::Error) -> Self {
        HydroError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for HydroError {
    fn from(err: serde_json::Error) -> Self {
        HydroError::DataIntegrity(format!("JSON error: {}", err))
    }
}
