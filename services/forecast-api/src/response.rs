//! Endpoint responses.

use forecast_engine::WarningTable;
use forecast_protocol::{Attachment, ErrorResponse, ReturnFormat};
use hydro_common::{HydroResult, ResultTable};
use serde_json::Value;

/// Response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// CSV download.
    Csv(Attachment),
    Json(Value),
    Xml(String),
    /// Finished table for in-process callers.
    Table(ResultTable),
    Warnings(WarningTable),
}

/// Status code plus payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Body,
}

impl ApiResponse {
    pub fn ok(body: Body) -> Self {
        Self { status: 200, body }
    }

    pub fn csv(attachment: Attachment) -> Self {
        Self::ok(Body::Csv(attachment))
    }

    pub fn json(value: Value) -> Self {
        Self::ok(Body::Json(value))
    }

    pub fn xml(document: String) -> Self {
        Self::ok(Body::Xml(document))
    }

    pub fn table(table: ResultTable) -> Self {
        Self::ok(Body::Table(table))
    }

    pub fn warnings(table: WarningTable) -> Self {
        Self::ok(Body::Warnings(table))
    }

    /// Error body with its mapped status.
    pub fn error(err: ErrorResponse) -> Self {
        let body = serde_json::to_value(&err.body).unwrap_or(Value::Null);
        Self {
            status: err.status,
            body: Body::Json(body),
        }
    }

    /// Collapse a handler result, turning errors into `{"error": ...}` bodies.
    pub fn from_result(result: HydroResult<ApiResponse>) -> Self {
        match result {
            Ok(response) => response,
            Err(err) => {
                if err.is_client_error() {
                    tracing::warn!(status = err.status_code(), error = %err, "Request rejected");
                } else {
                    tracing::error!(status = err.status_code(), error = %err, "Request failed");
                }
                Self::error(ErrorResponse::from(err))
            }
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn content_type(&self) -> &'static str {
        match &self.body {
            Body::Csv(a) => a.content_type,
            Body::Json(_) | Body::Table(_) | Body::Warnings(_) => ReturnFormat::Json.content_type(),
            Body::Xml(_) => ReturnFormat::Xml.content_type(),
        }
    }

    /// Error message, when this is an error response.
    pub fn error_message(&self) -> Option<&str> {
        match &self.body {
            Body::Json(value) if !self.is_success() => value.get("error").and_then(Value::as_str),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hydro_common::HydroError;

    #[test]
    fn test_error_result_becomes_json_body() {
        let resp = ApiResponse::from_result(Err(HydroError::not_found("Reach id 5 is not in any known region")));
        assert_eq!(resp.status, 404);
        assert!(!resp.is_success());
        assert_eq!(resp.error_message(), Some("Reach id 5 is not in any known region"));
        assert_eq!(resp.content_type(), "application/json");
    }

    #[test]
    fn test_ok_passthrough() {
        let resp = ApiResponse::from_result(Ok(ApiResponse::xml("<a/>".into())));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.content_type(), "application/xml");
        assert_eq!(resp.error_message(), None);
    }
}
