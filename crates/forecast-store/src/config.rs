//! Configuration for store access.

use std::path::PathBuf;

use hydro_common::DEFAULT_HIGH_RES_LABEL;
use serde::{Deserialize, Serialize};

use crate::region::RegionIndex;

/// Forecast record vintage served by the records path.
pub const DEFAULT_RECORD_YEAR: i32 = 2021;

/// Configuration for the store adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Root directory holding `forecasts/`, `forecast_records/`, `historical/` and `reaches/`.
    pub data_root: PathBuf,

    /// Year of the forecast record files.
    pub record_year: i32,

    /// Raw member label of the high-resolution run.
    pub high_res_label: u16,

    /// Reach id ranges per region.
    pub regions: RegionIndex,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("./data"),
            record_year: DEFAULT_RECORD_YEAR,
            high_res_label: DEFAULT_HIGH_RES_LABEL,
            regions: RegionIndex::default(),
        }
    }
}

impl StoreConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("FORECAST_DATA_ROOT") {
            config.data_root = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("FORECAST_RECORD_YEAR") {
            if let Ok(year) = val.parse() {
                config.record_year = year;
            }
        }

        if let Ok(val) = std::env::var("FORECAST_HIGH_RES_LABEL") {
            if let Ok(label) = val.parse() {
                config.high_res_label = label;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.data_root.as_os_str().is_empty() {
            return Err("data_root must not be empty".to_string());
        }

        if !(1900..=2200).contains(&self.record_year) {
            return Err(format!("record_year {} is out of range", self.record_year));
        }

        self.regions.validate()
    }
}
