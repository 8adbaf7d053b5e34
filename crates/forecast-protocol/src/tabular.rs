//! CSV encoding.

use forecast_engine::WarningTable;
use hydro_common::{HydroError, HydroResult, ResultTable};

use crate::{render_number, BLANK};

pub const DATETIME: &str = "datetime";
pub const REACH_ID: &str = "reach_id";

fn encoding_error(err: impl std::fmt::Display) -> HydroError {
    HydroError::encoding(format!("CSV error: {}", err))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> HydroResult<String> {
    let bytes = writer.into_inner().map_err(encoding_error)?;
    String::from_utf8(bytes).map_err(encoding_error)
}

/// One table: `datetime` followed by its unit-suffixed columns.
pub fn table_csv(table: &ResultTable) -> HydroResult<String> {
    concat_csv(&[table])
}

/// Stack tables row-wise over the union of their columns.
///
/// Columns keep first-seen order; a row leaves blank the cells of columns
/// its table does not carry. Each table keeps its own datetime format.
pub fn concat_csv(tables: &[&ResultTable]) -> HydroResult<String> {
    let mut header: Vec<String> = Vec::new();
    for table in tables {
        for label in table.column_labels() {
            if !header.contains(&label) {
                header.push(label);
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(std::iter::once(DATETIME).chain(header.iter().map(String::as_str)))
        .map_err(encoding_error)?;

    for table in tables {
        // Position of each header column inside this table, if present.
        let labels = table.column_labels();
        let lookup: Vec<Option<usize>> = header
            .iter()
            .map(|h| labels.iter().position(|l| l == h))
            .collect();

        for (row, stamp) in table.formatted_index().into_iter().enumerate() {
            let mut record = Vec::with_capacity(header.len() + 1);
            record.push(stamp);
            for pos in &lookup {
                record.push(match pos {
                    Some(col) => render_number(table.columns()[*col].values[row]),
                    None => BLANK.to_string(),
                });
            }
            writer.write_record(&record).map_err(encoding_error)?;
        }
    }

    finish(writer)
}

/// Warnings: `reach_id` followed by the union of row columns.
pub fn warnings_csv(table: &WarningTable) -> HydroResult<String> {
    let columns = table.column_names();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(std::iter::once(REACH_ID).chain(columns.iter().copied()))
        .map_err(encoding_error)?;

    for row in &table.rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(row.reach_id.to_string());
        for column in &columns {
            record.push(row.get(column).map(|v| v.to_string()).unwrap_or_default());
        }
        writer.write_record(&record).map_err(encoding_error)?;
    }

    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use forecast_engine::{WarningRow, WarningValue};
    use hydro_common::{Cms, FlowTable, ForecastDate, Precision, TimeFormat, Units};

    fn stats() -> ResultTable {
        let index = vec![
            Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 3, 1, 3, 0, 0).unwrap(),
        ];
        FlowTable::<Cms>::new(index)
            .with_series("flow_max", vec![3.0, 4.5])
            .unwrap()
            .with_series("flow_avg", vec![2.0, 2.123])
            .unwrap()
            .finish(Precision::default(), TimeFormat::Forecast)
    }

    fn records() -> ResultTable {
        let index = vec![Utc.with_ymd_and_hms(2021, 2, 28, 0, 0, 0).unwrap()];
        FlowTable::<Cms>::new(index)
            .with_series("flow_avg", vec![1.0])
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record)
    }

    #[test]
    fn test_table_csv() {
        let csv = table_csv(&stats()).unwrap();
        assert_eq!(
            csv,
            "datetime,flow_max_cms,flow_avg_cms\n\
             2021-03-01T00:00:00+00:00,3.0,2.0\n\
             2021-03-01T03:00:00+00:00,4.5,2.12\n"
        );
    }

    #[test]
    fn test_cfs_headers() {
        let index = vec![Utc.with_ymd_and_hms(2021, 3, 1, 0, 0, 0).unwrap()];
        let table = FlowTable::<Cms>::new(index)
            .with_series("flow_avg", vec![1.0])
            .unwrap()
            .finish_in(Units::Cfs, Precision::default(), TimeFormat::Forecast);
        let csv = table_csv(&table).unwrap();
        assert!(csv.starts_with("datetime,flow_avg_cfs\n"));
        assert!(csv.contains(",35.31\n"));
    }

    #[test]
    fn test_concat_outer_join() {
        let csv = concat_csv(&[&records(), &stats()]).unwrap();
        assert_eq!(
            csv,
            "datetime,flow_avg_cms,flow_max_cms\n\
             2021-02-28T00:00:00Z,1.0,\n\
             2021-03-01T00:00:00+00:00,2.0,3.0\n\
             2021-03-01T03:00:00+00:00,2.12,4.5\n"
        );
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let table = FlowTable::<Cms>::new(Vec::new())
            .with_series("flow_avg", Vec::new())
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record);
        assert_eq!(table_csv(&table).unwrap(), "datetime,flow_avg_cms\n");
    }

    #[test]
    fn test_warnings_csv() {
        let table = WarningTable {
            issue: ForecastDate::from_directory_name("20210301.00").unwrap(),
            rows: vec![
                WarningRow {
                    reach_id: 7,
                    columns: vec![("peak_flow_avg".into(), WarningValue::Number(12.5))],
                },
                WarningRow {
                    reach_id: 9,
                    columns: vec![
                        ("peak_flow_avg".into(), WarningValue::Number(3.0)),
                        ("peak_date".into(), WarningValue::Text("2021-03-02T00:00:00+00:00".into())),
                    ],
                },
            ],
        };
        assert_eq!(
            warnings_csv(&table).unwrap(),
            "reach_id,peak_flow_avg,peak_date\n\
             7,12.5,\n\
             9,3,2021-03-02T00:00:00+00:00\n"
        );
    }
}
