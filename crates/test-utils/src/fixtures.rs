//! Zarr fixture writers.
//!
//! Each writer creates one uncompressed Zarr V3 array at the given path with
//! the axis-label attributes the forecast store reads. Callers choose the
//! path, normally from the store's `DataLayout`.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use zarrs::array::{ArrayBuilder, DataType, FillValue};
use zarrs::array_subset::ArraySubset;
use zarrs_filesystem::FilesystemStore;

pub type FixtureResult = Result<(), Box<dyn Error>>;

/// Create a fresh temporary data root.
pub fn temp_data_root() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Write a float32 array with the given shape and attributes.
///
/// One chunk covers the whole array, which keeps fixtures to a single file.
pub fn write_array(path: &Path, shape: &[u64], attrs: Map<String, Value>, data: &[f32]) -> FixtureResult {
    let expected: u64 = shape.iter().product();
    if data.len() as u64 != expected {
        return Err(format!("fixture data has {} values for shape {:?}", data.len(), shape).into());
    }

    std::fs::create_dir_all(path)?;
    let store = Arc::new(FilesystemStore::new(path)?);

    let chunk_shape: Vec<u64> = shape.iter().map(|&d| d.max(1)).collect();
    let array = ArrayBuilder::new(
        shape.to_vec(),
        DataType::Float32,
        chunk_shape.try_into()?,
        FillValue::from(f32::NAN),
    )
    .attributes(attrs)
    .build(store.clone(), "/")?;

    array.store_metadata()?;

    if expected > 0 {
        let subset = ArraySubset::new_with_start_shape(vec![0; shape.len()], shape.to_vec())?;
        array.store_array_subset_elements(&subset, data)?;
    }

    Ok(())
}

fn attrs(pairs: Vec<(&str, Value)>) -> Map<String, Value> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Ensemble forecast, `[member, time, reach]`.
pub fn write_forecast(
    path: &Path,
    ensemble: &[u16],
    times: &[i64],
    reach_ids: &[u64],
    data: &[f32],
) -> FixtureResult {
    write_array(
        path,
        &[ensemble.len() as u64, times.len() as u64, reach_ids.len() as u64],
        attrs(vec![
            ("ensemble", json!(ensemble)),
            ("time", json!(times)),
            ("rivid", json!(reach_ids)),
            ("units", json!("m3/s")),
        ]),
        data,
    )
}

/// Forecast record, `[time, reach]`.
pub fn write_records(path: &Path, times: &[i64], reach_ids: &[u64], data: &[f32]) -> FixtureResult {
    write_array(
        path,
        &[times.len() as u64, reach_ids.len() as u64],
        attrs(vec![("time", json!(times)), ("rivid", json!(reach_ids))]),
        data,
    )
}

/// Day-of-year averages, `[reach, day]`.
pub fn write_daily_averages(path: &Path, reach_ids: &[u64], day_keys: &[String], data: &[f32]) -> FixtureResult {
    write_array(
        path,
        &[reach_ids.len() as u64, day_keys.len() as u64],
        attrs(vec![("rivid", json!(reach_ids)), ("day_keys", json!(day_keys))]),
        data,
    )
}

/// Return-period thresholds, `[reach, period]`.
pub fn write_return_periods(path: &Path, reach_ids: &[u64], names: &[&str], data: &[f32]) -> FixtureResult {
    write_array(
        path,
        &[reach_ids.len() as u64, names.len() as u64],
        attrs(vec![("rivid", json!(reach_ids)), ("return_periods", json!(names))]),
        data,
    )
}

/// Reach centroids, `[reach, 2]` holding `(lat, lon)`.
pub fn write_centroids(path: &Path, reach_ids: &[u64], coords: &[(f32, f32)]) -> FixtureResult {
    let data: Vec<f32> = coords.iter().flat_map(|&(lat, lon)| [lat, lon]).collect();
    write_array(
        path,
        &[reach_ids.len() as u64, 2],
        attrs(vec![("rivid", json!(reach_ids))]),
        &data,
    )
}

/// Standard return-period names, largest first.
pub const RETURN_PERIOD_NAMES: [&str; 7] = [
    "max_flow",
    "return_period_100",
    "return_period_50",
    "return_period_25",
    "return_period_10",
    "return_period_5",
    "return_period_2",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_array_creates_metadata() {
        let dir = temp_data_root();
        let path = dir.path().join("a.zarr");
        write_records(&path, &[0, 86_400], &[7], &[1.0, 2.0]).expect("write fixture");
        assert!(path.join("zarr.json").exists());
    }

    #[test]
    fn test_write_array_rejects_wrong_length() {
        let dir = temp_data_root();
        let path = dir.path().join("b.zarr");
        assert!(write_records(&path, &[0, 86_400], &[7], &[1.0]).is_err());
    }
}
