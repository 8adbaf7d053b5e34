//! Query parameters and their parsing.

use std::collections::HashMap;

use forecast_engine::MemberSelection;
use forecast_protocol::ReturnFormat;
use hydro_common::{HydroError, HydroResult, IssueDate, Units};

use crate::state::AppState;

pub const MISSING_REACH: &str = "Either reach_id or lat and lon parameters are required as input.";

/// Query string arguments of one request. Empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Non-empty value of a parameter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// `units`, defaulting to cms.
    pub fn units(&self) -> HydroResult<Units> {
        self.get("units").map(Units::parse).unwrap_or(Ok(Units::Cms))
    }

    /// `return_format`, defaulting to csv.
    pub fn return_format(&self) -> HydroResult<ReturnFormat> {
        ReturnFormat::from_query_param(self.get("return_format"))
    }

    /// `date`, defaulting to latest.
    pub fn issue_date(&self) -> HydroResult<IssueDate> {
        IssueDate::parse(self.get_or("date", "latest"))
    }

    /// `ensemble`, defaulting to every member.
    pub fn ensemble(&self) -> MemberSelection {
        MemberSelection::parse(self.get_or("ensemble", "all"))
    }

    /// A coordinate parameter, if present.
    pub fn coordinate(&self, key: &str) -> HydroResult<Option<f64>> {
        self.get(key)
            .map(|raw| {
                raw.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| HydroError::bad_request(format!("Unrecognized {} \"{}\"", key, raw)))
            })
            .transpose()
    }

    /// Reach id from `reach_id`, or the nearest reach to `lat`/`lon`.
    pub fn reach_id(&self, state: &AppState) -> HydroResult<u64> {
        if let Some(raw) = self.get("reach_id") {
            return parse_reach_id(raw);
        }
        match (self.coordinate("lat")?, self.coordinate("lon")?) {
            (Some(lat), Some(lon)) => Ok(state.engine.nearest_reach(lat, lon)?.reach_id),
            _ => Err(HydroError::bad_request(MISSING_REACH)),
        }
    }
}

pub fn parse_reach_id(raw: &str) -> HydroResult<u64> {
    raw.trim()
        .parse()
        .map_err(|_| HydroError::bad_request(format!("Unrecognized reach_id \"{}\"", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = QueryParams::new();
        assert_eq!(params.units().unwrap(), Units::Cms);
        assert_eq!(params.return_format().unwrap(), ReturnFormat::Csv);
        assert_eq!(params.issue_date().unwrap(), IssueDate::Latest);
        assert_eq!(params.ensemble(), MemberSelection::All);
    }

    #[test]
    fn test_empty_values_are_absent() {
        let params = QueryParams::from_pairs([("units", ""), ("date", " ")]);
        assert_eq!(params.get("units"), None);
        assert_eq!(params.units().unwrap(), Units::Cms);
        assert_eq!(params.issue_date().unwrap(), IssueDate::Latest);
    }

    #[test]
    fn test_bad_values() {
        let params = QueryParams::new().with("units", "kph").with("lat", "north");
        assert_eq!(params.units().unwrap_err().status_code(), 422);
        assert_eq!(
            params.coordinate("lat").unwrap_err().to_string(),
            "Unrecognized lat \"north\""
        );
        assert!(parse_reach_id("12a").is_err());
        assert_eq!(parse_reach_id(" 42 ").unwrap(), 42);
    }
}
