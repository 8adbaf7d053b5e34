//! Ensemble forecast arrays.

use chrono::{DateTime, Utc};
use hydro_common::time::from_unix_seconds;
use hydro_common::{ForecastDate, HydroError, HydroResult, Member};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::layout::DataLayout;
use crate::zarr::ZarrArray;

/// Flow values for one reach and one issue, indexed by (member, time).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastArray {
    reach_id: u64,
    issue: ForecastDate,
    members: Vec<Member>,
    times: Vec<DateTime<Utc>>,
    /// Member-major: `values[m * times.len() + t]`.
    values: Vec<f64>,
}

impl ForecastArray {
    pub fn new(
        reach_id: u64,
        issue: ForecastDate,
        members: Vec<Member>,
        times: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> HydroResult<Self> {
        if values.len() != members.len() * times.len() {
            return Err(HydroError::data_integrity(format!(
                "forecast for reach {} has {} values for {} members x {} times",
                reach_id,
                values.len(),
                members.len(),
                times.len()
            )));
        }
        Ok(Self {
            reach_id,
            issue,
            members,
            times,
            values,
        })
    }

    pub fn reach_id(&self) -> u64 {
        self.reach_id
    }

    pub fn issue(&self) -> ForecastDate {
        self.issue
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    /// The time series of one member, by position.
    pub fn member_values(&self, position: usize) -> &[f64] {
        let n = self.times.len();
        &self.values[position * n..(position + 1) * n]
    }

    /// Position of the high-resolution member, if present.
    pub fn high_resolution_position(&self) -> Option<usize> {
        self.members.iter().position(Member::is_high_resolution)
    }

    /// Positions of the perturbed members, in store order.
    pub fn perturbed_positions(&self) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.is_high_resolution())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Every reach of one region for one issue, as read by the warning scan.
#[derive(Debug, Clone)]
pub struct RegionForecast {
    region: String,
    issue: ForecastDate,
    members: Vec<Member>,
    times: Vec<DateTime<Utc>>,
    reach_ids: Vec<u64>,
    /// Row-major `[member, time, reach]`.
    values: Vec<f64>,
}

impl RegionForecast {
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn issue(&self) -> ForecastDate {
        self.issue
    }

    pub fn reach_ids(&self) -> &[u64] {
        &self.reach_ids
    }

    /// Extract one reach by column position.
    pub fn reach(&self, column: usize) -> ForecastArray {
        let n_times = self.times.len();
        let n_reaches = self.reach_ids.len();
        let mut values = Vec::with_capacity(self.members.len() * n_times);
        for m in 0..self.members.len() {
            for t in 0..n_times {
                values.push(self.values[(m * n_times + t) * n_reaches + column]);
            }
        }
        ForecastArray {
            reach_id: self.reach_ids[column],
            issue: self.issue,
            members: self.members.clone(),
            times: self.times.clone(),
            values,
        }
    }
}

/// Axis labels shared by the single-reach and whole-region reads.
struct ForecastAxes {
    members: Vec<Member>,
    times: Vec<DateTime<Utc>>,
    reach_ids: Vec<u64>,
}

fn open_forecast(layout: &DataLayout, region: &str, issue: &ForecastDate) -> Result<ZarrArray> {
    let path = layout.forecast_array(region, issue);
    ZarrArray::open(&path, || {
        format!("No forecast found for region {} on {}", region, issue.directory_name())
    })
}

fn read_axes(array: &ZarrArray, high_res_label: u16) -> Result<ForecastAxes> {
    array.expect_rank(3)?;
    let labels: Vec<u16> = array.axis_labels("ensemble", 0)?;
    let seconds: Vec<i64> = array.axis_labels("time", 1)?;
    let reach_ids: Vec<u64> = array.axis_labels("rivid", 2)?;

    let times = seconds
        .into_iter()
        .map(|s| from_unix_seconds(s).map_err(|e| StoreError::invalid_metadata(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    Ok(ForecastAxes {
        members: labels
            .into_iter()
            .map(|l| Member::from_label(l, high_res_label))
            .collect(),
        times,
        reach_ids,
    })
}

pub(crate) fn read_reach(
    layout: &DataLayout,
    region: &str,
    issue: &ForecastDate,
    reach_id: u64,
    high_res_label: u16,
) -> Result<ForecastArray> {
    let array = open_forecast(layout, region, issue)?;
    let axes = read_axes(&array, high_res_label)?;

    let column = axes
        .reach_ids
        .iter()
        .position(|&r| r == reach_id)
        .ok_or_else(|| {
            StoreError::not_found(format!(
                "Reach id {} not found in the {} forecast for {}",
                reach_id,
                region,
                issue.directory_name()
            ))
        })?;

    let n_members = axes.members.len() as u64;
    let n_times = axes.times.len() as u64;
    let values = array.read(vec![0, 0, column as u64], vec![n_members, n_times, 1])?;

    debug!(reach_id, region, issue = %issue, members = n_members, times = n_times, "Read forecast");

    Ok(ForecastArray {
        reach_id,
        issue: *issue,
        members: axes.members,
        times: axes.times,
        values,
    })
}

pub(crate) fn read_region(
    layout: &DataLayout,
    region: &str,
    issue: &ForecastDate,
    high_res_label: u16,
) -> Result<RegionForecast> {
    let array = open_forecast(layout, region, issue)?;
    let axes = read_axes(&array, high_res_label)?;
    let values = array.read_all()?;

    debug!(region, issue = %issue, reaches = axes.reach_ids.len(), "Read region forecast");

    Ok(RegionForecast {
        region: region.to_string(),
        issue: *issue,
        members: axes.members,
        times: axes.times,
        reach_ids: axes.reach_ids,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_checks_shape() {
        let issue = ForecastDate::from_directory_name("20210101.00").unwrap();
        let times = vec![Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()];
        let members = vec![Member::Perturbed(1), Member::HighResolution];
        assert!(ForecastArray::new(1, issue, members.clone(), times.clone(), vec![1.0, 2.0]).is_ok());
        assert!(ForecastArray::new(1, issue, members, times, vec![1.0]).is_err());
    }

    #[test]
    fn test_member_positions() {
        let issue = ForecastDate::from_directory_name("20210101.00").unwrap();
        let times = vec![
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 1, 3, 0, 0).unwrap(),
        ];
        let members = vec![Member::Perturbed(1), Member::HighResolution, Member::Perturbed(2)];
        let array = ForecastArray::new(7, issue, members, times, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(array.high_resolution_position(), Some(1));
        assert_eq!(array.perturbed_positions(), vec![0, 2]);
        assert_eq!(array.member_values(2), &[5.0, 6.0]);
    }
}
