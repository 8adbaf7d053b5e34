//! Forecast record arrays: one file per region per year, `[time, reach]`.

use chrono::{DateTime, Utc};
use hydro_common::time::from_unix_seconds;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::layout::DataLayout;
use crate::zarr::ZarrArray;

/// The full record series of one reach. NaN marks a missing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordArray {
    pub reach_id: u64,
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

pub(crate) fn read_reach(layout: &DataLayout, region: &str, year: i32, reach_id: u64) -> Result<RecordArray> {
    let path = layout.record_array(region, year);
    let array = ZarrArray::open(&path, || {
        format!("No forecast records found for region {} in {}", region, year)
    })?;
    array.expect_rank(2)?;

    let seconds: Vec<i64> = array.axis_labels("time", 0)?;
    let reach_ids: Vec<u64> = array.axis_labels("rivid", 1)?;

    let column = reach_ids.iter().position(|&r| r == reach_id).ok_or_else(|| {
        StoreError::not_found(format!(
            "Reach id {} not found in the {} forecast records",
            reach_id, region
        ))
    })?;

    let values = array.read(vec![0, column as u64], vec![seconds.len() as u64, 1])?;
    let times = seconds
        .into_iter()
        .map(|s| from_unix_seconds(s).map_err(|e| StoreError::invalid_metadata(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    debug!(reach_id, region, year, rows = times.len(), "Read forecast records");

    Ok(RecordArray {
        reach_id,
        times,
        values,
    })
}
