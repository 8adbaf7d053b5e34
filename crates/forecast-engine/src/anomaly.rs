//! Forecast anomalies against day-of-year averages.

use forecast_store::DailyAverages;
use hydro_common::time::day_key;
use hydro_common::{Cms, FlowTable, HydroError, HydroResult};

use crate::stats::FLOW_AVG;

pub const DAILY_AVG: &str = "daily_avg";
pub const ANOMALY: &str = "anomaly";

/// Inner-join a mean forecast with its baseline on `MM/DD` and add the
/// difference. Rows without a baseline value are dropped; several forecast
/// steps on one day all join to that day's average.
pub fn anomalies(mean: &FlowTable<Cms>, baseline: &DailyAverages) -> HydroResult<FlowTable<Cms>> {
    let forecast = mean
        .get(FLOW_AVG)
        .ok_or_else(|| HydroError::data_integrity("mean forecast is missing the flow_avg series"))?;

    let mut index = Vec::new();
    let mut flow_avg = Vec::new();
    let mut daily_avg = Vec::new();
    let mut anomaly = Vec::new();

    for (dt, &value) in mean.index().iter().zip(&forecast.values) {
        if let Some(avg) = baseline.get(&day_key(dt)) {
            index.push(*dt);
            flow_avg.push(value);
            daily_avg.push(avg);
            anomaly.push(value - avg);
        }
    }

    FlowTable::<Cms>::new(index)
        .with_series(FLOW_AVG, flow_avg)?
        .with_series(DAILY_AVG, daily_avg)?
        .with_series(ANOMALY, anomaly)
}
