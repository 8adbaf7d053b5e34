//! Integration test: run every engine operation against fixture stores.

use forecast_engine::{ExceedanceSource, ForecastEngine, MemberSelection, WarningRow, WarningValue};
use forecast_store::{DataLayout, ForecastStore, RegionIndex, RegionRange, StoreConfig};
use hydro_common::{DateRange, ForecastDate, HydroError, HydroResult, IssueDate, Precision, TimeFormat, Units, M3_TO_FT3};
use test_utils::{
    assert_approx_eq, day_keys, ensemble_block, ensemble_labels, grid_block, temp_data_root, unix_times,
    write_daily_averages, write_forecast, write_records, write_return_periods, RETURN_PERIOD_NAMES,
};

const NORTH: &str = "north";
const SOUTH: &str = "south";

fn issue(dir: &str) -> ForecastDate {
    ForecastDate::from_directory_name(dir).unwrap()
}

/// Two regions; `north` holds reaches 101..=103 and `south` 201.
///
/// Member m (0-based) of reach column r at step t carries `(m + 1) * (r + 1) + t`;
/// the high-resolution member (label 52) carries 1000.
fn build() -> (tempfile::TempDir, ForecastEngine) {
    let root = temp_data_root();
    let layout = DataLayout::new(root.path());
    let labels = ensemble_labels(52);
    let times = unix_times(2021, 3, 1, 12, 6); // 03/01 00:00 .. 03/03 12:00

    let north = ensemble_block(52, 6, 3, |m, t, r| {
        if m == 51 {
            1000.0
        } else {
            ((m + 1) * (r + 1) + t) as f32
        }
    });
    write_forecast(&layout.forecast_array(NORTH, &issue("20210301.00")), &labels, &times, &[101, 102, 103], &north)
        .unwrap();
    write_forecast(
        &layout.forecast_array(SOUTH, &issue("20210301.00")),
        &labels,
        &times,
        &[201],
        &ensemble_block(52, 6, 1, |_, _, _| 1.0),
    )
    .unwrap();

    write_records(
        &layout.record_array(NORTH, 2021),
        &unix_times(2021, 1, 1, 24, 5),
        &[101],
        &grid_block(5, 1, |t, _| (t + 1) as f32),
    )
    .unwrap();

    let keys = day_keys();
    write_daily_averages(
        &layout.daily_averages_array(NORTH),
        &[101],
        &keys,
        &grid_block(1, keys.len(), |_, d| if keys[d] == "03/01" { 20.0 } else { f32::NAN }),
    )
    .unwrap();

    // Every reach shares thresholds; only return_period_2 (50) is reachable.
    write_return_periods(
        &layout.return_periods_array(NORTH),
        &[101, 102, 103],
        &RETURN_PERIOD_NAMES,
        &grid_block(3, 7, |_, p| [900.0, 800.0, 700.0, 600.0, 500.0, 400.0, 50.0][p]),
    )
    .unwrap();

    let config = StoreConfig {
        regions: RegionIndex::new(vec![RegionRange::new(NORTH, 100, 199), RegionRange::new(SOUTH, 200, 299)]),
        ..StoreConfig::new(root.path())
    };
    (root, ForecastEngine::new(ForecastStore::new(config)))
}

#[test]
fn test_forecast_stats_pipeline() {
    let (_root, engine) = build();
    let table = engine.forecast_stats(101, IssueDate::Latest).unwrap();
    assert_eq!(table.len(), 6);

    // Pool at t=0 for r=0 is 1..=51
    assert_eq!(table.get("flow_min").unwrap().values[0], 1.0);
    assert_eq!(table.get("flow_max").unwrap().values[0], 51.0);
    assert_eq!(table.get("flow_avg").unwrap().values[0], 26.0);
    assert_eq!(table.get("flow_med").unwrap().values[0], 26.0);
    assert_eq!(table.get("flow_25p").unwrap().values[0], 13.5);
    assert_eq!(table.get("flow_75p").unwrap().values[0], 38.5);
    assert_eq!(table.get("high_res").unwrap().values[0], 1000.0);

    let result = table.finish_in(Units::Cfs, Precision::default(), TimeFormat::Forecast);
    assert_eq!(
        result.column_labels(),
        vec![
            "flow_max_cfs",
            "flow_75p_cfs",
            "flow_avg_cfs",
            "flow_med_cfs",
            "flow_25p_cfs",
            "flow_min_cfs",
            "high_res_cfs"
        ]
    );
    assert_approx_eq!(result.column("flow_avg").unwrap().values[0], 26.0 * M3_TO_FT3, 0.005);
    assert_eq!(result.formatted_index()[1], "2021-03-01T12:00:00+00:00");
}

#[test]
fn test_forecast_ensembles_selection() {
    let (_root, engine) = build();
    let table = engine
        .forecast_ensembles(102, IssueDate::parse("20210301").unwrap(), &MemberSelection::parse("1-3,5"))
        .unwrap();
    assert_eq!(
        table.series_names(),
        vec!["ensemble_01", "ensemble_02", "ensemble_03", "ensemble_05"]
    );
    assert_eq!(table.get("ensemble_03").unwrap().values[0], 6.0);

    let all = engine
        .forecast_ensembles(102, IssueDate::Latest, &MemberSelection::parse("all"))
        .unwrap();
    assert_eq!(all.series().len(), 52);
    assert_eq!(all.series()[51].name, "ensemble_52");
}

#[test]
fn test_forecast_records_window() {
    let (_root, engine) = build();
    let range = DateRange::parse("20210101", "20210103").unwrap();
    let table = engine.forecast_records(101, &range).unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table.get("flow_avg").unwrap().values, vec![1.0, 2.0, 3.0]);

    let result = table.finish(Precision::default(), TimeFormat::Record);
    assert_eq!(result.formatted_index()[0], "2021-01-01T00:00:00Z");

    let err = engine.forecast_records(102, &range).unwrap_err();
    assert!(matches!(err, HydroError::NotFound(_)));
}

#[test]
fn test_forecast_anomalies_join() {
    let (_root, engine) = build();
    let table = engine.forecast_anomalies(101, IssueDate::Latest).unwrap();
    // Only the two 03/01 steps have a baseline.
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("flow_avg").unwrap().values, vec![26.0, 27.0]);
    assert_eq!(table.get("daily_avg").unwrap().values, vec![20.0, 20.0]);
    assert_eq!(table.get("anomaly").unwrap().values, vec![6.0, 7.0]);
}

#[test]
fn test_forecast_warnings_across_regions() {
    let (_root, engine) = build();
    let table = engine.forecast_warnings(IssueDate::Latest).unwrap();
    assert_eq!(table.issue, issue("20210301.00"));

    // Reach 101 peaks at 31, 102 at 57, 103 at 83; south has no return periods.
    let reaches: Vec<u64> = table.rows.iter().map(|r| r.reach_id).collect();
    assert_eq!(reaches, vec![102, 103]);
    assert_eq!(table.rows[0].get("peak_flow_avg"), Some(&WarningValue::Number(57.0)));
    assert!(table.rows[0].get("date_exceeds_return_period_2").is_some());
    assert!(table.rows[0].get("date_exceeds_return_period_5").is_none());
}

struct FlagEverything;

impl ExceedanceSource for FlagEverything {
    fn exceedances(&self, store: &ForecastStore, region: &str, issue: &ForecastDate) -> HydroResult<Vec<WarningRow>> {
        let forecast = store.open_region_forecast(region, issue)?;
        Ok(forecast
            .reach_ids()
            .iter()
            .map(|&reach_id| WarningRow {
                reach_id,
                columns: vec![("region".to_string(), WarningValue::Text(region.to_string()))],
            })
            .collect())
    }
}

#[test]
fn test_custom_exceedance_source() {
    let (_root, engine) = build();
    let engine = engine.with_exceedance_source(FlagEverything);
    let table = engine.forecast_warnings(IssueDate::parse("20210301").unwrap()).unwrap();
    assert_eq!(table.len(), 4);
    assert_eq!(table.column_names(), vec!["region"]);
    assert_eq!(table.rows[3].get("region"), Some(&WarningValue::Text(SOUTH.to_string())));

    let err = engine.forecast_warnings(IssueDate::parse("20200101").unwrap()).unwrap_err();
    assert_eq!(err.status_code(), 404);
}
