//! Common types and utilities shared across the streamflow forecast crates.

pub mod error;
pub mod member;
pub mod precision;
pub mod table;
pub mod time;
pub mod units;

pub use error::{HydroError, HydroResult};
pub use member::{Member, DEFAULT_HIGH_RES_LABEL};
pub use precision::Precision;
pub use table::{FlowTable, ResultTable, Series};
pub use time::{DateRange, ForecastDate, IssueDate, TimeFormat};
pub use units::{Cfs, Cms, Flow, FlowUnit, Units, M3_TO_FT3};
