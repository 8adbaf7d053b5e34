//! Output format selection and attachments.

use hydro_common::{HydroError, HydroResult};

/// Requested output encoding, taken from the `return_format` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnFormat {
    #[default]
    Csv,
    Json,
    /// The finished table itself, for in-process callers.
    Df,
    /// WaterML values document.
    Xml,
}

impl ReturnFormat {
    /// Parse a format token. Tokens are case-insensitive.
    pub fn parse(token: &str) -> HydroResult<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReturnFormat::Csv),
            "json" => Ok(ReturnFormat::Json),
            "df" => Ok(ReturnFormat::Df),
            "xml" | "waterml" => Ok(ReturnFormat::Xml),
            _ => Err(HydroError::bad_request(format!(
                "Unsupported return format requested: {}",
                token
            ))),
        }
    }

    /// Parse an optional token, defaulting to CSV.
    pub fn from_query_param(token: Option<&str>) -> HydroResult<Self> {
        match token {
            None => Ok(Self::default()),
            Some(t) if t.trim().is_empty() => Ok(Self::default()),
            Some(t) => Self::parse(t),
        }
    }

    /// Content-Type header value for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ReturnFormat::Csv => "text/csv",
            ReturnFormat::Json | ReturnFormat::Df => "application/json",
            ReturnFormat::Xml => "application/xml",
        }
    }

    /// Reject formats an operation does not offer.
    pub fn require_one_of(self, allowed: &[ReturnFormat]) -> HydroResult<Self> {
        if allowed.contains(&self) {
            Ok(self)
        } else {
            Err(HydroError::bad_request(format!(
                "Unsupported return format requested: {}",
                self.token()
            )))
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            ReturnFormat::Csv => "csv",
            ReturnFormat::Json => "json",
            ReturnFormat::Df => "df",
            ReturnFormat::Xml => "xml",
        }
    }
}

/// A downloadable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

impl Attachment {
    /// CSV attachment named `{stem}.csv`.
    pub fn csv(stem: &str, body: String) -> Self {
        Self {
            filename: format!("{}.csv", stem),
            content_type: ReturnFormat::Csv.content_type(),
            body,
        }
    }

    /// `Content-Disposition` header value.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(ReturnFormat::parse("CSV").unwrap(), ReturnFormat::Csv);
        assert_eq!(ReturnFormat::parse("json").unwrap(), ReturnFormat::Json);
        assert_eq!(ReturnFormat::parse("waterml").unwrap(), ReturnFormat::Xml);
        assert_eq!(ReturnFormat::from_query_param(None).unwrap(), ReturnFormat::Csv);
        assert_eq!(ReturnFormat::from_query_param(Some("")).unwrap(), ReturnFormat::Csv);
    }

    #[test]
    fn test_unknown_format_is_bad_request() {
        let err = ReturnFormat::parse("parquet").unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.to_string(), "Unsupported return format requested: parquet");
    }

    #[test]
    fn test_require_one_of() {
        let allowed = [ReturnFormat::Csv, ReturnFormat::Json];
        assert!(ReturnFormat::Json.require_one_of(&allowed).is_ok());
        assert!(ReturnFormat::Df.require_one_of(&allowed).is_err());
    }

    #[test]
    fn test_attachment_names() {
        let a = Attachment::csv("forecast_stats_101_cms", String::new());
        assert_eq!(a.filename, "forecast_stats_101_cms.csv");
        assert_eq!(a.content_disposition(), "attachment; filename=\"forecast_stats_101_cms.csv\"");
    }
}
