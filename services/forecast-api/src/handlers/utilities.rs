//! Utility endpoints.

use hydro_common::{HydroError, HydroResult};
use serde_json::json;

use crate::params::{QueryParams, MISSING_REACH};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Nearest reach to `lat`/`lon`.
pub fn reach_id(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let (Some(lat), Some(lon)) = (params.coordinate("lat")?, params.coordinate("lon")?) else {
        return Err(HydroError::bad_request(MISSING_REACH));
    };

    let nearest = state.engine.nearest_reach(lat, lon)?;
    Ok(ApiResponse::json(json!({
        "reach_id": nearest.reach_id,
        "region": nearest.region,
        "distance_km": state.precision().round(nearest.distance_km),
    })))
}
