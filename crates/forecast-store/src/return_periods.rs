//! Return-period thresholds, `[reach, period]` named by the `return_periods` attribute.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, StoreError};
use crate::layout::DataLayout;
use crate::zarr::ZarrArray;

/// Named thresholds for one reach, in cms, in store order
/// (`max_flow`, `return_period_100`, ..., `return_period_2`).
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnPeriods {
    pub reach_id: u64,
    pub entries: Vec<(String, f64)>,
}

impl ReturnPeriods {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Entries named `return_period_N`, largest N first.
    pub fn thresholds(&self) -> Vec<(u32, f64)> {
        let mut out: Vec<(u32, f64)> = self
            .entries
            .iter()
            .filter_map(|(name, v)| {
                let years = name.strip_prefix("return_period_")?.parse().ok()?;
                v.is_finite().then_some((years, *v))
            })
            .collect();
        out.sort_by(|a, b| b.0.cmp(&a.0));
        out
    }
}

fn open(layout: &DataLayout, region: &str) -> Result<(ZarrArray, Vec<u64>, Vec<String>)> {
    let path = layout.return_periods_array(region);
    let array = ZarrArray::open(&path, || {
        format!("No return periods found for region {}", region)
    })?;
    array.expect_rank(2)?;
    let reach_ids: Vec<u64> = array.axis_labels("rivid", 0)?;
    let names: Vec<String> = array.axis_labels("return_periods", 1)?;
    Ok((array, reach_ids, names))
}

pub(crate) fn read_reach(layout: &DataLayout, region: &str, reach_id: u64) -> Result<ReturnPeriods> {
    let (array, reach_ids, names) = open(layout, region)?;
    let row = reach_ids.iter().position(|&r| r == reach_id).ok_or_else(|| {
        StoreError::not_found(format!(
            "Reach id {} not found in the {} return periods",
            reach_id, region
        ))
    })?;
    let values = array.read(vec![row as u64, 0], vec![1, names.len() as u64])?;
    Ok(ReturnPeriods {
        reach_id,
        entries: names.into_iter().zip(values).collect(),
    })
}

pub(crate) fn read_region(layout: &DataLayout, region: &str) -> Result<HashMap<u64, ReturnPeriods>> {
    let (array, reach_ids, names) = open(layout, region)?;
    let values = array.read_all()?;
    let width = names.len();

    let table: HashMap<u64, ReturnPeriods> = reach_ids
        .iter()
        .enumerate()
        .map(|(row, &reach_id)| {
            let entries = names
                .iter()
                .cloned()
                .zip(values[row * width..(row + 1) * width].iter().copied())
                .collect();
            (reach_id, ReturnPeriods { reach_id, entries })
        })
        .collect();

    debug!(region, reaches = table.len(), "Read region return periods");
    Ok(table)
}
