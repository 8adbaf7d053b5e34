//! On-disk layout of the datasets.

use std::path::{Path, PathBuf};

use hydro_common::ForecastDate;

pub const FORECASTS_DIR: &str = "forecasts";
pub const RECORDS_DIR: &str = "forecast_records";
pub const HISTORICAL_DIR: &str = "historical";
pub const REACHES_DIR: &str = "reaches";

pub const FORECAST_ARRAY: &str = "Qout.zarr";
pub const DAILY_AVERAGES_ARRAY: &str = "daily_averages.zarr";
pub const RETURN_PERIODS_ARRAY: &str = "return_periods.zarr";
pub const CENTROIDS_ARRAY: &str = "centroids.zarr";

/// Path builder rooted at the data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `{root}/forecasts/{region}`
    pub fn forecast_region_dir(&self, region: &str) -> PathBuf {
        self.root.join(FORECASTS_DIR).join(region)
    }

    /// `{root}/forecasts/{region}/{YYYYMMDD.HH}/Qout.zarr`
    pub fn forecast_array(&self, region: &str, date: &ForecastDate) -> PathBuf {
        self.forecast_region_dir(region)
            .join(date.directory_name())
            .join(FORECAST_ARRAY)
    }

    /// `{root}/forecast_records/{region}/forecast_record-{year}-{region}.zarr`
    pub fn record_array(&self, region: &str, year: i32) -> PathBuf {
        self.root
            .join(RECORDS_DIR)
            .join(region)
            .join(format!("forecast_record-{}-{}.zarr", year, region))
    }

    /// `{root}/historical/{region}/daily_averages.zarr`
    pub fn daily_averages_array(&self, region: &str) -> PathBuf {
        self.root.join(HISTORICAL_DIR).join(region).join(DAILY_AVERAGES_ARRAY)
    }

    /// `{root}/historical/{region}/return_periods.zarr`
    pub fn return_periods_array(&self, region: &str) -> PathBuf {
        self.root.join(HISTORICAL_DIR).join(region).join(RETURN_PERIODS_ARRAY)
    }

    /// `{root}/reaches/{region}/centroids.zarr`
    pub fn centroids_array(&self, region: &str) -> PathBuf {
        self.root.join(REACHES_DIR).join(region).join(CENTROIDS_ARRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let layout = DataLayout::new("/data");
        let date = ForecastDate::from_directory_name("20210101.00").unwrap();
        assert_eq!(
            layout.forecast_array("africa-geoglows", &date),
            PathBuf::from("/data/forecasts/africa-geoglows/20210101.00/Qout.zarr")
        );
        assert_eq!(
            layout.record_array("africa-geoglows", 2021),
            PathBuf::from("/data/forecast_records/africa-geoglows/forecast_record-2021-africa-geoglows.zarr")
        );
        assert_eq!(
            layout.return_periods_array("europe-geoglows"),
            PathBuf::from("/data/historical/europe-geoglows/return_periods.zarr")
        );
    }
}
