//! Decimal rounding applied to every value leaving the engine.

use serde::{Deserialize, Serialize};

/// Number of decimal places kept in output values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Precision(u32);

impl Precision {
    pub const DEFAULT: Precision = Precision(2);

    pub fn new(decimals: u32) -> Self {
        Self(decimals)
    }

    pub fn decimals(&self) -> u32 {
        self.0
    }

    /// Round half to even at the configured number of decimals.
    pub fn round(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let scale = 10f64.powi(self.0 as i32);
        (value * scale).round_ties_even() / scale
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_default_two_decimals() {
        let p = Precision::default();
        assert_eq!(p.round(1.23456), 1.23);
        assert_eq!(p.round(-0.004), -0.0);
        assert_eq!(p.round(70.629333), 70.63);
    }

    #[test]
    fn test_round_ties_to_even() {
        let p = Precision::new(0);
        assert_eq!(p.round(2.5), 2.0);
        assert_eq!(p.round(3.5), 4.0);
    }

    #[test]
    fn test_round_passes_nan_through() {
        assert!(Precision::default().round(f64::NAN).is_nan());
    }
}
