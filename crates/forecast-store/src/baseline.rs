//! Historical day-of-year averages, `[reach, day]` keyed by `MM/DD`.

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::layout::DataLayout;
use crate::zarr::ZarrArray;

/// Average flow per `MM/DD` key for one reach, in cms.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyAverages {
    pub reach_id: u64,
    entries: Vec<(String, f64)>,
}

impl DailyAverages {
    /// Build from key/value pairs. Non-finite values are treated as missing.
    pub fn new(reach_id: u64, entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            reach_id,
            entries: entries.into_iter().filter(|(_, v)| v.is_finite()).collect(),
        }
    }

    pub fn get(&self, day_key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == day_key)
            .map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub(crate) fn read_reach(layout: &DataLayout, region: &str, reach_id: u64) -> Result<DailyAverages> {
    let path = layout.daily_averages_array(region);
    let array = ZarrArray::open(&path, || {
        format!("No historical daily averages found for region {}", region)
    })?;
    array.expect_rank(2)?;

    let reach_ids: Vec<u64> = array.axis_labels("rivid", 0)?;
    let day_keys: Vec<String> = array.axis_labels("day_keys", 1)?;

    let row = reach_ids.iter().position(|&r| r == reach_id).ok_or_else(|| {
        StoreError::not_found(format!(
            "Reach id {} not found in the {} daily averages",
            reach_id, region
        ))
    })?;

    let values = array.read(vec![row as u64, 0], vec![1, day_keys.len() as u64])?;
    debug!(reach_id, region, days = day_keys.len(), "Read daily averages");

    Ok(DailyAverages::new(reach_id, day_keys.into_iter().zip(values)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_days_are_dropped() {
        let avg = DailyAverages::new(
            1,
            vec![("01/01".to_string(), 3.0), ("01/02".to_string(), f64::NAN)],
        );
        assert_eq!(avg.len(), 1);
        assert_eq!(avg.get("01/01"), Some(3.0));
        assert_eq!(avg.get("01/02"), None);
    }
}
