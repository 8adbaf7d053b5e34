//! WaterOneFlow `GetValues`.

use forecast_protocol::waterml::{self, ValuesQuery};
use hydro_common::{DateRange, HydroError, HydroResult, IssueDate, TimeFormat};

use crate::params::{parse_reach_id, QueryParams};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Variables served by `GetValues`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variable {
    /// Forecast record series.
    Records,
    /// Mean of the latest forecast.
    Forecast,
}

impl Variable {
    pub fn parse(token: &str) -> HydroResult<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "records" | "forecast_records" => Ok(Variable::Records),
            "forecast" => Ok(Variable::Forecast),
            _ => Err(HydroError::bad_request(format!(
                "Unrecognized variable \"{}\". Use records or forecast",
                token
            ))),
        }
    }
}

/// `network:reach_id` or a bare reach id.
fn location_reach_id(location: &str) -> HydroResult<u64> {
    let code = location.rsplit(':').next().unwrap_or(location);
    parse_reach_id(code)
}

pub fn get_values(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let location = params
        .get("location")
        .ok_or_else(|| HydroError::bad_request("location parameter is required"))?;
    let reach_id = location_reach_id(location)?;
    let variable_token = params.get_or("variable", "");
    let variable = Variable::parse(variable_token)?;
    let units = params.units()?;
    let start_date = params.get_or("startDate", "");
    let end_date = params.get_or("endDate", "");

    let table = match variable {
        Variable::Records => {
            let range = DateRange::parse(start_date, end_date)?;
            state
                .engine
                .forecast_records(reach_id, &range)?
                .finish_in(units, state.precision(), TimeFormat::Record)
        }
        Variable::Forecast => {
            let mut mean = state.engine.forecast(reach_id, IssueDate::Latest)?;
            if params.get("startDate").is_some() || params.get("endDate").is_some() {
                let range = DateRange::parse(start_date, end_date)?;
                mean.retain_rows(|dt| range.contains(dt));
            }
            mean.finish_in(units, state.precision(), TimeFormat::Forecast)
        }
    };

    let query = ValuesQuery {
        location: location.to_string(),
        variable: variable_token.to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
    };
    Ok(ApiResponse::xml(waterml::values_document(reach_id, &query, &table)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_forms() {
        assert_eq!(location_reach_id("geoglows:101").unwrap(), 101);
        assert_eq!(location_reach_id("101").unwrap(), 101);
        assert!(location_reach_id("geoglows:").is_err());
    }

    #[test]
    fn test_variable_tokens() {
        assert_eq!(Variable::parse("Records").unwrap(), Variable::Records);
        assert_eq!(Variable::parse("forecast").unwrap(), Variable::Forecast);
        assert_eq!(Variable::parse("snow").unwrap_err().status_code(), 422);
    }
}
