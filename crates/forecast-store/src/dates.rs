//! Issue-date discovery by directory scan.

use std::collections::BTreeSet;

use hydro_common::ForecastDate;

use crate::error::Result;
use crate::layout::DataLayout;

/// Issue dates present for one region, ascending. A missing region
/// directory yields an empty list.
pub(crate) fn list(layout: &DataLayout, region: &str) -> Result<Vec<ForecastDate>> {
    let dir = layout.forecast_region_dir(region);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dates = BTreeSet::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        if let Some(date) = entry.file_name().to_str().and_then(ForecastDate::from_directory_name) {
            dates.insert(date);
        }
    }
    Ok(dates.into_iter().collect())
}

/// Union of issue dates across regions, ascending.
pub(crate) fn list_all<'a>(
    layout: &DataLayout,
    regions: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<ForecastDate>> {
    let mut dates = BTreeSet::new();
    for region in regions {
        dates.extend(list(layout, region)?);
    }
    Ok(dates.into_iter().collect())
}
