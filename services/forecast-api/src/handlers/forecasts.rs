//! Forecast endpoints.

use forecast_protocol::{envelope, tabular, Attachment, ReturnFormat};
use hydro_common::{
    Cms, DateRange, Flow, HydroError, HydroResult, IssueDate, Precision, ResultTable, TimeFormat, Units,
};
use serde_json::json;

use crate::params::QueryParams;
use crate::response::ApiResponse;
use crate::state::AppState;

const TABLE_FORMATS: [ReturnFormat; 3] = [ReturnFormat::Csv, ReturnFormat::Json, ReturnFormat::Df];
const DOCUMENT_FORMATS: [ReturnFormat; 2] = [ReturnFormat::Csv, ReturnFormat::Json];

/// Encode a finished table in the requested format.
fn render(reach_id: u64, stem: &str, table: ResultTable, format: ReturnFormat) -> HydroResult<ApiResponse> {
    match format {
        ReturnFormat::Csv => Ok(ApiResponse::csv(Attachment::csv(stem, tabular::table_csv(&table)?))),
        ReturnFormat::Json => Ok(ApiResponse::json(envelope::table_envelope(reach_id, &table)?)),
        ReturnFormat::Df => Ok(ApiResponse::table(table)),
        ReturnFormat::Xml => Err(HydroError::bad_request(format!(
            "Unsupported return format requested: {}",
            format.token()
        ))),
    }
}

/// Convert a stored cms value and round it.
fn convert(value: f64, units: Units, precision: Precision) -> f64 {
    let value = match units {
        Units::Cms => value,
        Units::Cfs => Flow::<Cms>::new(value).into_cfs().value(),
    };
    precision.round(value)
}

pub fn forecast_stats(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;

    let table = state
        .engine
        .forecast_stats(reach_id, params.issue_date()?)?
        .finish_in(units, state.precision(), TimeFormat::Forecast);
    render(reach_id, &format!("forecast_stats_{}_{}", reach_id, units), table, format)
}

pub fn forecast(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;

    let table = state
        .engine
        .forecast(reach_id, params.issue_date()?)?
        .finish_in(units, state.precision(), TimeFormat::Forecast);
    render(reach_id, &format!("forecast_{}_{}", reach_id, units), table, format)
}

pub fn forecast_ensembles(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;

    let table = state
        .engine
        .forecast_ensembles(reach_id, params.issue_date()?, &params.ensemble())?
        .finish_in(units, state.precision(), TimeFormat::Forecast);
    render(reach_id, &format!("forecast_ensembles_{}_{}", reach_id, units), table, format)
}

pub fn forecast_records(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;
    let range = DateRange::parse(params.get_or("start_date", ""), params.get_or("end_date", ""))?;

    let table = state
        .engine
        .forecast_records(reach_id, &range)?
        .finish_in(units, state.precision(), TimeFormat::Record);
    render(reach_id, &format!("forecast_records_{}", reach_id), table, format)
}

pub fn forecast_anomalies(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;

    let table = state
        .engine
        .forecast_anomalies(reach_id, params.issue_date()?)?
        .finish_in(units, state.precision(), TimeFormat::Forecast);
    render(reach_id, &format!("forecast_anomalies_{}", reach_id), table, format)
}

/// Flagged reaches for one issue date. Takes no reach.
pub fn forecast_warnings(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let format = params.return_format()?.require_one_of(&TABLE_FORMATS)?;
    let table = state.engine.forecast_warnings(params.issue_date()?)?;

    match format {
        ReturnFormat::Json => Ok(ApiResponse::json(envelope::warnings_envelope(&table)?)),
        ReturnFormat::Df => Ok(ApiResponse::warnings(table)),
        _ => {
            let stem = format!("forecast_warnings_{}", table.issue.compact());
            Ok(ApiResponse::csv(Attachment::csv(&stem, tabular::warnings_csv(&table)?)))
        }
    }
}

/// Forecast stats plus the records from `start_date` up to the issue date.
pub fn hydroviewer(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let reach_id = params.reach_id(state)?;
    let units = params.units()?;
    let format = params.return_format()?.require_one_of(&DOCUMENT_FORMATS)?;
    let precision = state.precision();

    let issue = state.engine.resolve_issue(reach_id, params.issue_date()?)?;
    let range = DateRange::parse(params.get_or("start_date", ""), &issue.compact())?;

    let stats = state
        .engine
        .forecast_stats(reach_id, IssueDate::On(issue))?
        .finish_in(units, precision, TimeFormat::Forecast);
    let records = state
        .engine
        .forecast_records(reach_id, &range)?
        .finish_in(units, precision, TimeFormat::Record);

    match format {
        ReturnFormat::Json => {
            let return_periods: Vec<(String, f64)> = state
                .engine
                .return_periods(reach_id)?
                .entries
                .into_iter()
                .map(|(name, value)| (name, convert(value, units, precision)))
                .collect();
            Ok(ApiResponse::json(envelope::hydroviewer_envelope(
                reach_id,
                &stats,
                &records,
                &return_periods,
            )?))
        }
        _ => {
            let body = tabular::concat_csv(&[&records, &stats])?;
            Ok(ApiResponse::csv(Attachment::csv(&format!("hydroviewer_data_{}", reach_id), body)))
        }
    }
}

/// Issue dates on disk, optionally for one region.
pub fn available_dates(state: &AppState, params: &QueryParams) -> HydroResult<ApiResponse> {
    let region = params.get("region");
    if let Some(region) = region {
        let known = state.engine.store().config().regions.names().any(|name| name == region);
        if !known {
            return Err(HydroError::not_found(format!("Region {} is not known", region)));
        }
    }

    let dates: Vec<String> = state
        .engine
        .available_dates(region)?
        .iter()
        .map(|d| d.directory_name())
        .collect();
    Ok(ApiResponse::json(json!({ "dates": dates })))
}
