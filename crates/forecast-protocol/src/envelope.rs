//! Structured JSON envelopes.
//!
//! Every envelope carries `metadata.series`, the fixed order of the data keys,
//! because JSON object key order is not preserved by consumers.

use forecast_engine::WarningTable;
use hydro_common::{HydroError, HydroResult, ResultTable, Units};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::tabular::DATETIME;
use crate::BLANK;

pub const DATETIME_STATS: &str = "datetime_stats";
pub const DATETIME_REC: &str = "datetime_rec";
pub const RECORD_SUFFIX: &str = "_rec";

/// Request metadata shared by every table envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub reach_id: u64,
    pub units: Units,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub series: Vec<String>,
}

/// A finite number, or `""` where the value is missing.
fn number_or_blank(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(BLANK.to_string()))
}

fn column_values(values: &[f64]) -> Value {
    Value::Array(values.iter().copied().map(number_or_blank).collect())
}

fn strings(values: Vec<String>) -> Value {
    Value::Array(values.into_iter().map(Value::String).collect())
}

fn assemble(metadata: Metadata, data: Map<String, Value>) -> HydroResult<Value> {
    let mut root = Map::new();
    root.insert("metadata".to_string(), serde_json::to_value(metadata)?);
    root.extend(data);
    Ok(Value::Object(root))
}

/// Envelope for a single table: `datetime` plus one array per column.
pub fn table_envelope(reach_id: u64, table: &ResultTable) -> HydroResult<Value> {
    let fmt = table.time_format();
    let mut series = vec![DATETIME.to_string()];
    let mut data = Map::new();
    data.insert(DATETIME.to_string(), strings(table.formatted_index()));

    for column in table.columns() {
        let label = table.column_label(column);
        data.insert(label.clone(), column_values(&column.values));
        series.push(label);
    }

    let metadata = Metadata {
        reach_id,
        units: table.units(),
        start_date: table.first_timestamp().map(|dt| fmt.format(dt)),
        end_date: table.last_timestamp().map(|dt| fmt.format(dt)),
        series,
    };
    assemble(metadata, data)
}

/// Hydroviewer envelope: forecast stats, recent records and return periods.
///
/// Record columns are renamed with a `_rec` suffix. `start_date` is the first
/// record (or the first stats row when there are no records) and `end_date`
/// the last stats row. Return periods arrive already converted and rounded.
pub fn hydroviewer_envelope(
    reach_id: u64,
    stats: &ResultTable,
    records: &ResultTable,
    return_periods: &[(String, f64)],
) -> HydroResult<Value> {
    if stats.units() != records.units() {
        return Err(HydroError::data_integrity(format!(
            "hydroviewer tables disagree on units: {} and {}",
            stats.units(),
            records.units()
        )));
    }

    let mut series = vec![DATETIME_STATS.to_string(), DATETIME_REC.to_string()];
    let mut data = Map::new();
    data.insert(DATETIME_STATS.to_string(), strings(stats.formatted_index()));
    data.insert(DATETIME_REC.to_string(), strings(records.formatted_index()));

    for column in stats.columns() {
        let label = stats.column_label(column);
        data.insert(label.clone(), column_values(&column.values));
        series.push(label);
    }
    for column in records.columns() {
        let label = format!("{}{}", records.column_label(column), RECORD_SUFFIX);
        data.insert(label.clone(), column_values(&column.values));
        series.push(label);
    }
    for (name, value) in return_periods {
        data.insert(name.clone(), number_or_blank(*value));
        series.push(name.clone());
    }

    let start_date = records
        .first_timestamp()
        .map(|dt| records.time_format().format(dt))
        .or_else(|| stats.first_timestamp().map(|dt| stats.time_format().format(dt)));
    let metadata = Metadata {
        reach_id,
        units: stats.units(),
        start_date,
        end_date: stats.last_timestamp().map(|dt| stats.time_format().format(dt)),
        series,
    };
    assemble(metadata, data)
}

/// Warnings keyed by reach id: `{"101": {"peak_flow_avg": 12.5, ...}}`.
pub fn warnings_envelope(table: &WarningTable) -> HydroResult<Value> {
    let mut root = Map::new();
    for row in &table.rows {
        let mut columns = Map::new();
        for (name, value) in &row.columns {
            columns.insert(name.clone(), serde_json::to_value(value)?);
        }
        root.insert(row.reach_id.to_string(), Value::Object(columns));
    }
    Ok(Value::Object(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use forecast_engine::{WarningRow, WarningValue};
    use hydro_common::{Cms, FlowTable, ForecastDate, Precision, TimeFormat};
    use serde_json::json;

    fn stats(units: Units) -> ResultTable {
        let index = vec![
            Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 1, 3, 0, 0).unwrap(),
        ];
        FlowTable::<Cms>::new(index)
            .with_series("flow_avg", vec![2.0, 3.0])
            .unwrap()
            .with_series("high_res", vec![5.0, 6.0])
            .unwrap()
            .finish_in(units, Precision::default(), TimeFormat::Forecast)
    }

    fn records() -> ResultTable {
        let index = vec![Utc.with_ymd_and_hms(2021, 2, 27, 0, 0, 0).unwrap()];
        FlowTable::<Cms>::new(index)
            .with_series("flow_avg", vec![1.5])
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record)
    }

    #[test]
    fn test_table_envelope() {
        let value = table_envelope(101, &stats(Units::Cms)).unwrap();
        assert_eq!(value["metadata"]["reach_id"], json!(101));
        assert_eq!(value["metadata"]["units"], json!("cms"));
        assert_eq!(value["metadata"]["start_date"], json!("2021-03-01T00:00:00+00:00"));
        assert_eq!(value["metadata"]["end_date"], json!("2021-03-01T03:00:00+00:00"));
        assert_eq!(
            value["metadata"]["series"],
            json!(["datetime", "flow_avg_cms", "high_res_cms"])
        );
        assert_eq!(value["flow_avg_cms"], json!([2.0, 3.0]));
        assert_eq!(value["datetime"][1], json!("2021-03-01T03:00:00+00:00"));
    }

    #[test]
    fn test_empty_table_has_null_dates() {
        let empty = FlowTable::<Cms>::new(Vec::new())
            .with_series("flow_avg", Vec::new())
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record);
        let value = table_envelope(1, &empty).unwrap();
        assert_eq!(value["metadata"]["start_date"], Value::Null);
        assert_eq!(value["flow_avg_cms"], json!([]));
    }

    #[test]
    fn test_hydroviewer_envelope() {
        let rp = vec![("max_flow".to_string(), 90.0), ("return_period_2".to_string(), 40.0)];
        let value = hydroviewer_envelope(101, &stats(Units::Cms), &records(), &rp).unwrap();
        assert_eq!(
            value["metadata"]["series"],
            json!([
                "datetime_stats",
                "datetime_rec",
                "flow_avg_cms",
                "high_res_cms",
                "flow_avg_cms_rec",
                "max_flow",
                "return_period_2"
            ])
        );
        assert_eq!(value["metadata"]["start_date"], json!("2021-02-27T00:00:00Z"));
        assert_eq!(value["metadata"]["end_date"], json!("2021-03-01T03:00:00+00:00"));
        assert_eq!(value["flow_avg_cms_rec"], json!([1.5]));
        assert_eq!(value["return_period_2"], json!(40.0));
    }

    #[test]
    fn test_hydroviewer_rejects_mixed_units() {
        let err = hydroviewer_envelope(101, &stats(Units::Cfs), &records(), &[]).unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_warnings_envelope() {
        let table = WarningTable {
            issue: ForecastDate::from_directory_name("20210301.00").unwrap(),
            rows: vec![WarningRow {
                reach_id: 7,
                columns: vec![
                    ("peak_flow_avg".into(), WarningValue::Number(12.5)),
                    ("peak_date".into(), WarningValue::Text("2021-03-02T00:00:00+00:00".into())),
                ],
            }],
        };
        let value = warnings_envelope(&table).unwrap();
        assert_eq!(value["7"]["peak_flow_avg"], json!(12.5));
        assert_eq!(value["7"]["peak_date"], json!("2021-03-02T00:00:00+00:00"));
    }
}
