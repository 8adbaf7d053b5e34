//! Axis and value generators for synthetic forecast data.

use chrono::{Duration, NaiveDate, TimeZone, Utc};

/// Unix seconds for `n` steps of `step_hours`, starting at midnight UTC on the given day.
///
/// ```
/// use test_utils::unix_times;
///
/// let t = unix_times(2021, 1, 1, 3, 2);
/// assert_eq!(t, vec![1_609_459_200, 1_609_470_000]);
/// ```
pub fn unix_times(year: i32, month: u32, day: u32, step_hours: i64, n: usize) -> Vec<i64> {
    let start = Utc
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid start date");
    (0..n as i64)
        .map(|i| (start + Duration::hours(i * step_hours)).timestamp())
        .collect()
}

/// Daily unix seconds from one date for `n` days.
pub fn daily_unix_times(year: i32, month: u32, day: u32, n: usize) -> Vec<i64> {
    unix_times(year, month, day, 24, n)
}

/// All 366 `MM/DD` keys of a leap year, in calendar order.
pub fn day_keys() -> Vec<String> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date");
    (0..366)
        .map(|i| (start + Duration::days(i)).format("%m/%d").to_string())
        .collect()
}

/// Raw ensemble labels `1..=count`.
pub fn ensemble_labels(count: u16) -> Vec<u16> {
    (1..=count).collect()
}

/// Fill a `[member, time, reach]` block from a closure of `(member, time, reach)` positions.
pub fn ensemble_block<F>(members: usize, times: usize, reaches: usize, f: F) -> Vec<f32>
where
    F: Fn(usize, usize, usize) -> f32,
{
    let mut data = Vec::with_capacity(members * times * reaches);
    for m in 0..members {
        for t in 0..times {
            for r in 0..reaches {
                data.push(f(m, t, r));
            }
        }
    }
    data
}

/// Fill a 2-D row-major block from a closure of `(row, col)`.
pub fn grid_block<F>(rows: usize, cols: usize, f: F) -> Vec<f32>
where
    F: Fn(usize, usize) -> f32,
{
    let mut data = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            data.push(f(r, c));
        }
    }
    data
}
