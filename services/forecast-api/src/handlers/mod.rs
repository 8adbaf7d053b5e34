//! Endpoint handlers and path dispatch.

pub mod forecasts;
pub mod utilities;
pub mod water_one_flow;

use forecast_protocol::ErrorResponse;
use hydro_common::HydroResult;
use tracing::debug;

use crate::params::QueryParams;
use crate::response::ApiResponse;
use crate::state::AppState;

/// An endpoint as a function of state and query parameters.
pub type Handler = fn(&AppState, &QueryParams) -> HydroResult<ApiResponse>;

/// Route names, matched against the trailing segments of a request path.
pub const ROUTES: &[(&str, Handler)] = &[
    ("ForecastStats", forecasts::forecast_stats),
    ("ForecastEnsembles", forecasts::forecast_ensembles),
    ("ForecastRecords", forecasts::forecast_records),
    ("ForecastAnomalies", forecasts::forecast_anomalies),
    ("ForecastWarnings", forecasts::forecast_warnings),
    ("Forecast", forecasts::forecast),
    ("HydroViewer", forecasts::hydroviewer),
    ("AvailableDates", forecasts::available_dates),
    ("GetReachID", utilities::reach_id),
    ("wof/GetValues", water_one_flow::get_values),
];

/// Find the handler for a path such as `/api/v2/ForecastStats/`.
pub fn route(path: &str) -> Option<(&'static str, Handler)> {
    let trimmed = path.trim_matches('/');
    ROUTES.iter().copied().find(|(name, _)| {
        trimmed == *name
            || trimmed
                .strip_suffix(name)
                .is_some_and(|prefix| prefix.ends_with('/'))
    })
}

/// Run the endpoint for `path`. Unknown paths get a 404 error body.
pub fn dispatch(state: &AppState, path: &str, params: &QueryParams) -> ApiResponse {
    let Some((name, handler)) = route(path) else {
        debug!(path, "No route");
        return ApiResponse::error(ErrorResponse::endpoint_not_found(path));
    };

    let response = ApiResponse::from_result(handler(state, params));
    debug!(route = name, status = response.status, "Handled request");
    response
}
