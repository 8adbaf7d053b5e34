//! Forecast aggregation engine.
//!
//! Reduces ensemble forecast arrays into summary statistics, filters
//! ensemble members, windows forecast records, computes anomalies against
//! day-of-year baselines and scans forecasts for warnings. Every operation
//! returns a [`FlowTable<Cms>`](hydro_common::FlowTable); converting and
//! rounding happen once, when the caller finishes the table.

pub mod anomaly;
pub mod engine;
pub mod ensembles;
pub mod records;
pub mod selector;
pub mod stats;
pub mod warnings;

pub use engine::ForecastEngine;
pub use selector::MemberSelection;
pub use warnings::{ExceedanceSource, ReturnPeriodComparator, WarningRow, WarningTable, WarningValue};
