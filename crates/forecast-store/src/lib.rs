//! Read-only array store adapter.
//!
//! Every dataset is a Zarr V3 array on the local filesystem. Axis labels
//! live in the array attributes (`rivid`, `ensemble`, `time`, `day_keys`,
//! `return_periods`), and NaN marks a missing value. Each read opens its own
//! store handle and drops it before returning, so concurrent readers never
//! share state.

pub mod baseline;
pub mod config;
pub mod dates;
pub mod error;
pub mod forecast;
pub mod layout;
pub mod locator;
pub mod records;
pub mod region;
pub mod return_periods;
mod store;
mod zarr;

pub use baseline::DailyAverages;
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use forecast::{ForecastArray, RegionForecast};
pub use layout::DataLayout;
pub use locator::NearestReach;
pub use records::RecordArray;
pub use region::{RegionIndex, RegionRange};
pub use return_periods::ReturnPeriods;
pub use store::ForecastStore;
