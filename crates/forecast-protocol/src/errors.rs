//! Error bodies returned to callers.

use hydro_common::HydroError;
use serde::{Deserialize, Serialize};

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self { error: message.into() }
    }
}

/// An error body paired with its HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: ErrorBody,
}

impl ErrorResponse {
    /// Unknown route.
    pub fn endpoint_not_found(path: &str) -> Self {
        Self {
            status: 404,
            body: ErrorBody::new(format!(
                "API Endpoint not found: {} -> Check spelling and the API docs",
                path
            )),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.body).unwrap_or_else(|_| format!("{{\"error\": {:?}}}", self.body.error))
    }
}

impl From<&HydroError> for ErrorResponse {
    fn from(err: &HydroError) -> Self {
        Self {
            status: err.status_code(),
            body: ErrorBody::new(err.to_string()),
        }
    }
}

impl From<HydroError> for ErrorResponse {
    fn from(err: HydroError) -> Self {
        Self::from(&err)
    }
}
