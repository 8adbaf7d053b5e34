//! Flow units.
//!
//! Values read from the stores are always cubic meters per second. The
//! marker types let the aggregation code carry the unit in the type, so a
//! table can only be converted through [`Flow::into_cfs`]-style methods that
//! exist for the matching source unit.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{HydroError, HydroResult};

/// Cubic feet per cubic meter.
pub const M3_TO_FT3: f64 = 35.3146667;

/// Runtime unit selector, as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Cubic meters per second.
    #[default]
    Cms,
    /// Cubic feet per second.
    Cfs,
}

impl Units {
    /// Suffix used on column names and attachment names.
    pub fn label(&self) -> &'static str {
        match self {
            Units::Cms => "cms",
            Units::Cfs => "cfs",
        }
    }

    /// Parse a units token, case-insensitively.
    pub fn parse(token: &str) -> HydroResult<Self> {
        match token.trim().to_lowercase().as_str() {
            "cms" => Ok(Units::Cms),
            "cfs" => Ok(Units::Cfs),
            _ => Err(HydroError::bad_request(format!(
                "Unrecognized units \"{}\". Use cms or cfs",
                token
            ))),
        }
    }
}

impl FromStr for Units {
    type Err = HydroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::parse(s)
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Type-level unit tag.
pub trait FlowUnit: Copy + Send + Sync + fmt::Debug + 'static {
    const UNITS: Units;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct Cms;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub struct Cfs;

impl FlowUnit for Cms {
    const UNITS: Units = Units::Cms;
}

impl FlowUnit for Cfs {
    const UNITS: Units = Units::Cfs;
}

/// A single flow value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Flow<U: FlowUnit> {
    value: f64,
    unit: PhantomData<U>,
}

impl<U: FlowUnit> Flow<U> {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            unit: PhantomData,
        }
    }

    pub fn value(self) -> f64 {
        self.value
    }

    pub fn units(self) -> Units {
        U::UNITS
    }
}

impl Flow<Cms> {
    pub fn into_cfs(self) -> Flow<Cfs> {
        Flow::new(self.value * M3_TO_FT3)
    }
}

impl Flow<Cfs> {
    pub fn into_cms(self) -> Flow<Cms> {
        Flow::new(self.value / M3_TO_FT3)
    }
}
