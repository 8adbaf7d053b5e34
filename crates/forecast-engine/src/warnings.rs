//! Forecast warnings.
//!
//! Deciding what counts as an exceedance belongs to an [`ExceedanceSource`].
//! The scanner only chooses the issue date, walks the regions that have it
//! and stacks whatever rows the source returns. Column sets are opaque and
//! may differ between rows.

use std::collections::HashMap;

use forecast_store::{ForecastStore, ReturnPeriods, StoreError};
use hydro_common::{Cms, FlowTable, ForecastDate, HydroResult, Precision, TimeFormat};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::stats::{self, FLOW_AVG};

/// A single warning cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WarningValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for WarningValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningValue::Number(v) => write!(f, "{}", v),
            WarningValue::Text(s) => f.write_str(s),
        }
    }
}

/// One flagged reach.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningRow {
    pub reach_id: u64,
    pub columns: Vec<(String, WarningValue)>,
}

impl WarningRow {
    pub fn get(&self, column: &str) -> Option<&WarningValue> {
        self.columns.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }
}

/// Flagged reaches for one issue, sorted by reach id.
#[derive(Debug, Clone, PartialEq)]
pub struct WarningTable {
    pub issue: ForecastDate,
    pub rows: Vec<WarningRow>,
}

impl WarningTable {
    /// Union of row columns in first-seen order.
    pub fn column_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            for (name, _) in &row.columns {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Produces warning rows for every reach of a region.
pub trait ExceedanceSource: Send + Sync {
    fn exceedances(&self, store: &ForecastStore, region: &str, issue: &ForecastDate) -> HydroResult<Vec<WarningRow>>;
}

/// Flags reaches whose mean forecast reaches a return-period threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnPeriodComparator {
    pub precision: Precision,
}

impl ReturnPeriodComparator {
    pub fn new(precision: Precision) -> Self {
        Self { precision }
    }

    /// Compare one reach's mean forecast against its thresholds.
    pub fn evaluate(&self, reach_id: u64, mean: &FlowTable<Cms>, thresholds: &ReturnPeriods) -> Option<WarningRow> {
        let values = &mean.get(FLOW_AVG)?.values;
        let (peak_pos, peak) = values
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        let exceeded: Vec<(u32, usize)> = thresholds
            .thresholds()
            .into_iter()
            .filter(|&(_, level)| level > 0.0 && peak >= level)
            .filter_map(|(years, level)| values.iter().position(|&v| v >= level).map(|first| (years, first)))
            .collect();
        if exceeded.is_empty() {
            return None;
        }

        let fmt = |pos: usize| TimeFormat::Forecast.format(&mean.index()[pos]);
        let mut columns = vec![
            ("peak_flow_avg".to_string(), WarningValue::Number(self.precision.round(peak))),
            ("peak_date".to_string(), WarningValue::Text(fmt(peak_pos))),
        ];
        columns.extend(exceeded.into_iter().map(|(years, first)| {
            (
                format!("date_exceeds_return_period_{}", years),
                WarningValue::Text(fmt(first)),
            )
        }));

        Some(WarningRow { reach_id, columns })
    }
}

impl ExceedanceSource for ReturnPeriodComparator {
    fn exceedances(&self, store: &ForecastStore, region: &str, issue: &ForecastDate) -> HydroResult<Vec<WarningRow>> {
        let thresholds: HashMap<u64, ReturnPeriods> = match store.read_region_return_periods(region) {
            Ok(t) => t,
            Err(StoreError::NotFound(msg)) => {
                warn!(region, %msg, "Skipping region without return periods");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let forecast = store.open_region_forecast(region, issue)?;

        let rows: Vec<Option<WarningRow>> = (0..forecast.reach_ids().len())
            .into_par_iter()
            .map(|column| -> HydroResult<Option<WarningRow>> {
                let reach_id = forecast.reach_ids()[column];
                let Some(rp) = thresholds.get(&reach_id) else {
                    return Ok(None);
                };
                let mean = stats::mean_forecast(&forecast.reach(column))?;
                Ok(self.evaluate(reach_id, &mean, rp))
            })
            .collect::<HydroResult<_>>()?;

        let rows: Vec<WarningRow> = rows.into_iter().flatten().collect();
        debug!(region, issue = %issue, flagged = rows.len(), "Evaluated region warnings");
        Ok(rows)
    }
}

/// Collect rows across every region with the given issue.
pub fn scan<S>(store: &ForecastStore, source: &S, issue: ForecastDate) -> HydroResult<WarningTable>
where
    S: ExceedanceSource + ?Sized,
{
    let regions = store.regions_with_issue(&issue);
    if regions.is_empty() {
        return Err(StoreError::not_found(format!(
            "No forecasts available for {}",
            issue.directory_name()
        ))
        .into());
    }

    let mut rows = Vec::new();
    for region in &regions {
        rows.extend(source.exceedances(store, region, &issue)?);
    }
    rows.sort_by_key(|r| r.reach_id);

    Ok(WarningTable { issue, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn mean(values: Vec<f64>) -> FlowTable<Cms> {
        let index = (0..values.len() as u32)
            .map(|i| Utc.with_ymd_and_hms(2021, 1, 1 + i, 0, 0, 0).unwrap())
            .collect();
        FlowTable::new(index).with_series(FLOW_AVG, values).unwrap()
    }

    fn thresholds() -> ReturnPeriods {
        ReturnPeriods {
            reach_id: 1,
            entries: vec![
                ("max_flow".to_string(), 500.0),
                ("return_period_10".to_string(), 200.0),
                ("return_period_5".to_string(), 150.0),
                ("return_period_2".to_string(), 100.0),
            ],
        }
    }

    #[test]
    fn test_below_threshold_not_flagged() {
        let c = ReturnPeriodComparator::default();
        assert!(c.evaluate(1, &mean(vec![10.0, 99.9, 50.0]), &thresholds()).is_none());
    }

    #[test]
    fn test_flags_exceeded_thresholds_with_first_dates() {
        let c = ReturnPeriodComparator::default();
        let row = c
            .evaluate(1, &mean(vec![90.0, 120.0, 160.0, 140.0]), &thresholds())
            .unwrap();
        let names: Vec<&str> = row.columns.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "peak_flow_avg",
                "peak_date",
                "date_exceeds_return_period_5",
                "date_exceeds_return_period_2"
            ]
        );
        assert_eq!(row.get("peak_flow_avg"), Some(&WarningValue::Number(160.0)));
        assert_eq!(
            row.get("date_exceeds_return_period_2"),
            Some(&WarningValue::Text("2021-01-02T00:00:00+00:00".to_string()))
        );
        assert_eq!(
            row.get("peak_date"),
            Some(&WarningValue::Text("2021-01-03T00:00:00+00:00".to_string()))
        );
    }

    #[test]
    fn test_column_union_first_seen() {
        let table = WarningTable {
            issue: ForecastDate::from_directory_name("20210101.00").unwrap(),
            rows: vec![
                WarningRow {
                    reach_id: 1,
                    columns: vec![("a".into(), WarningValue::Number(1.0))],
                },
                WarningRow {
                    reach_id: 2,
                    columns: vec![
                        ("b".into(), WarningValue::Number(2.0)),
                        ("a".into(), WarningValue::Number(3.0)),
                    ],
                },
            ],
        };
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }
}
