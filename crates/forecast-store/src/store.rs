use std::collections::HashMap;

use hydro_common::{ForecastDate, IssueDate};
use tracing::{debug, info};

use crate::baseline::{self, DailyAverages};
use crate::config::StoreConfig;
use crate::dates;
use crate::error::{Result, StoreError};
use crate::forecast::{self, ForecastArray, RegionForecast};
use crate::layout::DataLayout;
use crate::locator::{self, NearestReach};
use crate::records::{self, RecordArray};
use crate::return_periods::{self, ReturnPeriods};

/// Entry point for every read. Holds only configuration, so it is cheap to
/// share between threads; each call opens and releases its own handles.
#[derive(Debug, Clone)]
pub struct ForecastStore {
    config: StoreConfig,
    layout: DataLayout,
}

impl ForecastStore {
    pub fn new(config: StoreConfig) -> Self {
        let layout = DataLayout::new(config.data_root.clone());
        info!(
            data_root = %config.data_root.display(),
            regions = config.regions.regions.len(),
            record_year = config.record_year,
            "Forecast store configured"
        );
        Self { config, layout }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn high_res_label(&self) -> u16 {
        self.config.high_res_label
    }

    pub fn region_for(&self, reach_id: u64) -> Result<&str> {
        self.config.regions.region_for(reach_id)
    }

    /// Issue dates on disk for one region, or for every configured region.
    pub fn available_dates(&self, region: Option<&str>) -> Result<Vec<ForecastDate>> {
        match region {
            Some(region) => dates::list(&self.layout, region),
            None => dates::list_all(&self.layout, self.config.regions.names()),
        }
    }

    /// Resolve `latest` against one region, or across all regions when `region` is `None`.
    pub fn resolve_issue(&self, region: Option<&str>, issue: IssueDate) -> Result<ForecastDate> {
        match issue {
            IssueDate::On(date) => Ok(date),
            IssueDate::Latest => {
                let latest = self.available_dates(region)?.pop().ok_or_else(|| {
                    StoreError::not_found(match region {
                        Some(r) => format!("No forecasts available for region {}", r),
                        None => "No forecasts available".to_string(),
                    })
                })?;
                debug!(region = ?region, latest = %latest, "Resolved latest issue date");
                Ok(latest)
            }
        }
    }

    /// Regions that have a forecast array for the given issue.
    pub fn regions_with_issue(&self, issue: &ForecastDate) -> Vec<String> {
        self.config
            .regions
            .names()
            .filter(|region| self.layout.forecast_array(region, issue).is_dir())
            .map(str::to_string)
            .collect()
    }

    /// Open the forecast for one reach.
    pub fn open_forecast(&self, reach_id: u64, issue: IssueDate) -> Result<ForecastArray> {
        let region = self.region_for(reach_id)?;
        let issue = self.resolve_issue(Some(region), issue)?;
        forecast::read_reach(&self.layout, region, &issue, reach_id, self.config.high_res_label)
    }

    /// Open every reach of a region for one issue.
    pub fn open_region_forecast(&self, region: &str, issue: &ForecastDate) -> Result<RegionForecast> {
        forecast::read_region(&self.layout, region, issue, self.config.high_res_label)
    }

    /// Full record series of a reach for the configured record year.
    pub fn read_records(&self, reach_id: u64) -> Result<RecordArray> {
        let region = self.region_for(reach_id)?;
        records::read_reach(&self.layout, region, self.config.record_year, reach_id)
    }

    pub fn read_daily_averages(&self, reach_id: u64) -> Result<DailyAverages> {
        let region = self.region_for(reach_id)?;
        baseline::read_reach(&self.layout, region, reach_id)
    }

    pub fn read_return_periods(&self, reach_id: u64) -> Result<ReturnPeriods> {
        let region = self.region_for(reach_id)?;
        return_periods::read_reach(&self.layout, region, reach_id)
    }

    pub fn read_region_return_periods(&self, region: &str) -> Result<HashMap<u64, ReturnPeriods>> {
        return_periods::read_region(&self.layout, region)
    }

    pub fn nearest_reach(&self, lat: f64, lon: f64) -> Result<NearestReach> {
        locator::nearest(&self.layout, &self.config.regions, lat, lon)
    }
}
