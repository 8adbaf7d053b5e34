//! Ensemble members.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw store label of the high-resolution run in the global model.
pub const DEFAULT_HIGH_RES_LABEL: u16 = 52;

/// One member of a forecast ensemble.
///
/// The high-resolution run is stored alongside the perturbed members but is
/// never part of the statistical pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Member {
    Perturbed(u16),
    HighResolution,
}

impl Member {
    /// Classify a raw store label.
    pub fn from_label(label: u16, high_res_label: u16) -> Self {
        if label == high_res_label {
            Member::HighResolution
        } else {
            Member::Perturbed(label)
        }
    }

    /// The raw store label for this member.
    pub fn label(&self, high_res_label: u16) -> u16 {
        match self {
            Member::Perturbed(label) => *label,
            Member::HighResolution => high_res_label,
        }
    }

    pub fn is_high_resolution(&self) -> bool {
        matches!(self, Member::HighResolution)
    }

    /// Column name used by the ensembles operation, e.g. `ensemble_07`.
    pub fn column_name(&self, high_res_label: u16) -> String {
        format!("ensemble_{:02}", self.label(high_res_label))
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Perturbed(label) => write!(f, "member {}", label),
            Member::HighResolution => f.write_str("high-resolution member"),
        }
    }
}
