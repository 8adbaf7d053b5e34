//! Reach id to region lookup.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// An inclusive block of reach ids belonging to one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRange {
    pub name: String,
    pub min_reach_id: u64,
    pub max_reach_id: u64,
}

impl RegionRange {
    pub fn new(name: impl Into<String>, min_reach_id: u64, max_reach_id: u64) -> Self {
        Self {
            name: name.into(),
            min_reach_id,
            max_reach_id,
        }
    }

    pub fn contains(&self, reach_id: u64) -> bool {
        reach_id >= self.min_reach_id && reach_id <= self.max_reach_id
    }
}

/// Table of region ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionIndex {
    pub regions: Vec<RegionRange>,
}

impl Default for RegionIndex {
    /// Reach numbering of the global model.
    fn default() -> Self {
        let block = |name: &str, lo: u64, hi: u64| RegionRange::new(format!("{}-geoglows", name), lo, hi);
        Self {
            regions: vec![
                block("australia", 200_000, 299_999),
                block("middle_east", 600_000, 699_999),
                block("africa", 800_000, 899_999),
                block("central_america", 900_000, 999_999),
                block("islands", 1_000_000, 1_999_999),
                block("japan", 3_000_000, 3_999_999),
                block("east_asia", 4_000_000, 4_999_999),
                block("south_asia", 5_000_000, 5_999_999),
                block("central_asia", 7_000_000, 7_999_999),
                block("south_america", 9_000_000, 9_999_999),
                block("west_asia", 10_000_000, 10_999_999),
                block("europe", 12_000_000, 12_999_999),
                block("north_america", 13_000_000, 13_999_999),
            ],
        }
    }
}

impl RegionIndex {
    pub fn new(regions: Vec<RegionRange>) -> Self {
        Self { regions }
    }

    /// Region holding a reach id.
    pub fn region_for(&self, reach_id: u64) -> Result<&str> {
        self.regions
            .iter()
            .find(|r| r.contains(reach_id))
            .map(|r| r.name.as_str())
            .ok_or_else(|| StoreError::not_found(format!("Reach id {} is not in any known region", reach_id)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Check for empty or overlapping ranges.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.regions.is_empty() {
            return Err("region index must contain at least one region".to_string());
        }
        for r in &self.regions {
            if r.min_reach_id > r.max_reach_id {
                return Err(format!("region {} has min_reach_id > max_reach_id", r.name));
            }
        }
        let mut sorted: Vec<&RegionRange> = self.regions.iter().collect();
        sorted.sort_by_key(|r| r.min_reach_id);
        for pair in sorted.windows(2) {
            if pair[1].min_reach_id <= pair[0].max_reach_id {
                return Err(format!("regions {} and {} overlap", pair[0].name, pair[1].name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lookup() {
        let index = RegionIndex::default();
        assert_eq!(index.region_for(250_001).unwrap(), "australia-geoglows");
        assert_eq!(index.region_for(910_000).unwrap(), "central_america-geoglows");
        assert_eq!(index.region_for(9_000_123).unwrap(), "south_america-geoglows");
        assert_eq!(index.region_for(13_000_001).unwrap(), "north_america-geoglows");
        assert!(index.validate().is_ok());
    }

    #[test]
    fn test_unknown_reach_is_not_found() {
        let err = RegionIndex::default().region_for(42).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn test_validate_rejects_overlap() {
        let index = RegionIndex::new(vec![
            RegionRange::new("a", 0, 100),
            RegionRange::new("b", 100, 200),
        ]);
        assert!(index.validate().unwrap_err().contains("overlap"));
        assert!(RegionIndex::new(vec![]).validate().is_err());
    }
}
