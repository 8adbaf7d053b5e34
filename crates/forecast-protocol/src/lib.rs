//! Response encodings for the forecast service.
//!
//! Every operation ends in one of these encoders:
//! - [`tabular`]: CSV attachments with a leading `datetime` column
//! - [`envelope`]: JSON objects with `metadata.series` ordering
//! - [`waterml`]: WaterOneFlow `GetValues` documents
//!
//! Errors are reported with [`errors::ErrorBody`], a single `error` field.

pub mod envelope;
pub mod errors;
pub mod format;
pub mod tabular;
pub mod waterml;

pub use errors::{ErrorBody, ErrorResponse};
pub use format::{Attachment, ReturnFormat};
pub use waterml::ValuesQuery;

/// Blank cell used where a value is missing.
pub(crate) const BLANK: &str = "";

/// Render a float the way tabular output expects: `26.0`, `1.5`, blank for NaN.
pub(crate) fn render_number(value: f64) -> String {
    if value.is_finite() {
        format!("{:?}", value)
    } else {
        BLANK.to_string()
    }
}
