//! Forecast record windowing.

use forecast_store::RecordArray;
use hydro_common::{Cms, DateRange, FlowTable, HydroResult};

use crate::stats::FLOW_AVG;

/// Rows of `records` inside the inclusive window, missing values dropped,
/// as a single `flow_avg` series.
pub fn window(records: &RecordArray, range: &DateRange) -> HydroResult<FlowTable<Cms>> {
    let (times, values): (Vec<_>, Vec<_>) = records
        .times
        .iter()
        .zip(&records.values)
        .filter(|(t, v)| range.contains(t) && v.is_finite())
        .map(|(t, v)| (*t, *v))
        .unzip();
    FlowTable::<Cms>::new(times).with_series(FLOW_AVG, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn daily(n: i64, values: Vec<f64>) -> RecordArray {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        RecordArray {
            reach_id: 42,
            times: (0..n).map(|d| start + Duration::days(d)).collect(),
            values,
        }
    }

    #[test]
    fn test_three_day_window() {
        let records = daily(5, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let range = DateRange::parse("20210101", "20210103").unwrap();
        let table = window(&records, &range).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(FLOW_AVG).unwrap().values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_same_day_window() {
        let records = daily(5, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let range = DateRange::parse("20210102", "20210102").unwrap();
        assert_eq!(window(&records, &range).unwrap().len(), 1);

        let range = DateRange::parse("20220102", "20220102").unwrap();
        assert!(window(&records, &range).unwrap().is_empty());
    }

    #[test]
    fn test_subdaily_rows_after_midnight_on_end_date_excluded() {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let records = RecordArray {
            reach_id: 42,
            times: (0..12).map(|h| start + Duration::hours(h * 6)).collect(),
            values: vec![1.0; 12],
        };
        let range = DateRange::parse("20210101", "20210102").unwrap();
        // 4 steps on the 1st plus midnight of the 2nd
        assert_eq!(window(&records, &range).unwrap().len(), 5);
    }

    #[test]
    fn test_missing_values_dropped() {
        let records = daily(3, vec![1.0, f64::NAN, 3.0]);
        let range = DateRange::parse("20210101", "20210103").unwrap();
        let table = window(&records, &range).unwrap();
        assert_eq!(table.get(FLOW_AVG).unwrap().values, vec![1.0, 3.0]);
    }
}
