//! Ensemble statistics.
//!
//! The statistical pool is every perturbed member. Pool values at or below
//! zero are clamped to zero before reduction; the high-resolution member is
//! reported unclamped as its own series.

use forecast_store::ForecastArray;
use hydro_common::{Cms, FlowTable, HydroError, HydroResult};

pub const FLOW_MAX: &str = "flow_max";
pub const FLOW_75P: &str = "flow_75p";
pub const FLOW_AVG: &str = "flow_avg";
pub const FLOW_MED: &str = "flow_med";
pub const FLOW_25P: &str = "flow_25p";
pub const FLOW_MIN: &str = "flow_min";
pub const HIGH_RES: &str = "high_res";

/// Series of the stats table, in output order.
pub const STAT_SERIES: [&str; 7] = [FLOW_MAX, FLOW_75P, FLOW_AVG, FLOW_MED, FLOW_25P, FLOW_MIN, HIGH_RES];

/// Percentile with linear interpolation between order statistics.
/// `sorted` must be ascending and non-empty; `q` is in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

/// Clamped pool values per timestep.
struct Pool {
    /// Time-major: `columns[t]` holds one value per perturbed member.
    columns: Vec<Vec<f64>>,
}

impl Pool {
    fn from_array(array: &ForecastArray) -> HydroResult<Self> {
        let positions = array.perturbed_positions();
        if positions.is_empty() {
            return Err(HydroError::data_integrity(format!(
                "forecast for reach {} has no perturbed members",
                array.reach_id()
            )));
        }

        let n_times = array.times().len();
        let mut columns = vec![Vec::with_capacity(positions.len()); n_times];
        for &p in &positions {
            for (t, &v) in array.member_values(p).iter().enumerate() {
                columns[t].push(if v <= 0.0 { 0.0 } else { v });
            }
        }
        Ok(Self { columns })
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Summary statistics of one timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepStats {
    pub max: f64,
    pub p75: f64,
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub min: f64,
}

impl StepStats {
    /// Reduce one timestep. Any non-finite input makes every statistic NaN.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
            return Self {
                max: f64::NAN,
                p75: f64::NAN,
                mean: f64::NAN,
                median: f64::NAN,
                p25: f64::NAN,
                min: f64::NAN,
            };
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self {
            max: sorted[sorted.len() - 1],
            p75: percentile(&sorted, 0.75),
            mean: Pool::mean(&sorted),
            median: percentile(&sorted, 0.5),
            p25: percentile(&sorted, 0.25),
            min: sorted[0],
        }
    }
}

/// Reduce the member axis into the seven-series stats table.
///
/// Fails when the high-resolution member is absent or the pool is empty.
/// Rows with any non-finite value are dropped.
pub fn aggregate(array: &ForecastArray) -> HydroResult<FlowTable<Cms>> {
    let high_res = array.high_resolution_position().ok_or_else(|| {
        HydroError::data_integrity(format!(
            "forecast for reach {} on {} has no high-resolution member",
            array.reach_id(),
            array.issue()
        ))
    })?;
    let pool = Pool::from_array(array)?;

    let stats: Vec<StepStats> = pool.columns.iter().map(|c| StepStats::from_values(c)).collect();
    let pick = |f: fn(&StepStats) -> f64| stats.iter().map(f).collect::<Vec<f64>>();

    let mut table = FlowTable::<Cms>::new(array.times().to_vec())
        .with_series(FLOW_MAX, pick(|s| s.max))?
        .with_series(FLOW_75P, pick(|s| s.p75))?
        .with_series(FLOW_AVG, pick(|s| s.mean))?
        .with_series(FLOW_MED, pick(|s| s.median))?
        .with_series(FLOW_25P, pick(|s| s.p25))?
        .with_series(FLOW_MIN, pick(|s| s.min))?
        .with_series(HIGH_RES, array.member_values(high_res).to_vec())?;
    table.drop_incomplete_rows();
    Ok(table)
}

/// Mean of the pool only, as a single `flow_avg` series.
pub fn mean_forecast(array: &ForecastArray) -> HydroResult<FlowTable<Cms>> {
    let pool = Pool::from_array(array)?;
    let means = pool.columns.iter().map(|c| Pool::mean(c)).collect();
    let mut table = FlowTable::<Cms>::new(array.times().to_vec()).with_series(FLOW_AVG, means)?;
    table.drop_incomplete_rows();
    Ok(table)
}
