//! WaterOneFlow `GetValues` documents (WaterML 1.1 values subset).

use std::io::Cursor;

use hydro_common::{HydroError, HydroResult, ResultTable};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

pub const WATERML_NS: &str = "http://www.cuahsi.org/waterML/1.1/";
pub const SITE_NETWORK: &str = "geoglows";
pub const NO_DATA_VALUE: &str = "-9999";

/// Parameters echoed in `queryInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuesQuery {
    pub location: String,
    pub variable: String,
    pub start_date: String,
    pub end_date: String,
}

fn xml_error(err: impl std::fmt::Display) -> HydroError {
    HydroError::encoding(format!("XML error: {}", err))
}

struct Doc {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Doc {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> HydroResult<()> {
        self.writer.write_event(event).map_err(xml_error)
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> HydroResult<()> {
        self.event(Event::Start(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    fn close(&mut self, name: &str) -> HydroResult<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> HydroResult<()> {
        self.event(Event::Empty(BytesStart::new(name).with_attributes(attrs.iter().copied())))
    }

    fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> HydroResult<()> {
        self.open(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn into_string(self) -> HydroResult<String> {
        String::from_utf8(self.writer.into_inner().into_inner()).map_err(xml_error)
    }
}

/// One `timeSeries` per table column; missing values use the no-data marker.
pub fn values_document(reach_id: u64, query: &ValuesQuery, table: &ResultTable) -> HydroResult<String> {
    let site = reach_id.to_string();
    let stamps = table.formatted_index();
    let units = table.units().label();

    let mut doc = Doc::new();
    doc.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    doc.open("timeSeriesResponse", &[("xmlns", WATERML_NS)])?;

    doc.open("queryInfo", &[])?;
    doc.open("criteria", &[("MethodCalled", "GetValues")])?;
    for (name, value) in [
        ("location", query.location.as_str()),
        ("variable", query.variable.as_str()),
        ("startDate", query.start_date.as_str()),
        ("endDate", query.end_date.as_str()),
    ] {
        doc.empty("parameter", &[("name", name), ("value", value)])?;
    }
    doc.close("criteria")?;
    doc.close("queryInfo")?;

    for column in table.columns() {
        let label = table.column_label(column);
        doc.open("timeSeries", &[("name", label.as_str())])?;

        doc.open("sourceInfo", &[])?;
        doc.text_element("siteName", &[], &format!("Reach {}", site))?;
        doc.text_element("siteCode", &[("network", SITE_NETWORK)], &site)?;
        doc.close("sourceInfo")?;

        doc.open("variable", &[])?;
        doc.text_element("variableCode", &[("vocabulary", SITE_NETWORK)], &column.name)?;
        doc.text_element("variableName", &[], &query.variable)?;
        doc.open("unit", &[])?;
        doc.text_element("unitAbbreviation", &[], units)?;
        doc.close("unit")?;
        doc.text_element("noDataValue", &[], NO_DATA_VALUE)?;
        doc.close("variable")?;

        doc.open("values", &[])?;
        for (stamp, value) in stamps.iter().zip(&column.values) {
            let text = if value.is_finite() {
                value.to_string()
            } else {
                NO_DATA_VALUE.to_string()
            };
            doc.text_element("value", &[("dateTime", stamp.as_str())], &text)?;
        }
        doc.close("values")?;

        doc.close("timeSeries")?;
    }

    doc.close("timeSeriesResponse")?;
    doc.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hydro_common::{Cms, FlowTable, Precision, TimeFormat};

    fn query() -> ValuesQuery {
        ValuesQuery {
            location: "geoglows:101".into(),
            variable: "records".into(),
            start_date: "20210101".into(),
            end_date: "20210102".into(),
        }
    }

    #[test]
    fn test_values_document() {
        let index = vec![
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
        ];
        let table = FlowTable::<Cms>::new(index)
            .with_series("flow_avg", vec![1.5, f64::NAN])
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record);

        let xml = values_document(101, &query(), &table).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<timeSeriesResponse xmlns=\"http://www.cuahsi.org/waterML/1.1/\">"));
        assert!(xml.contains("<parameter name=\"location\" value=\"geoglows:101\"/>"));
        assert!(xml.contains("<timeSeries name=\"flow_avg_cms\">"));
        assert!(xml.contains("<siteCode network=\"geoglows\">101</siteCode>"));
        assert!(xml.contains("<value dateTime=\"2021-01-01T00:00:00Z\">1.5</value>"));
        assert!(xml.contains("<value dateTime=\"2021-01-02T00:00:00Z\">-9999</value>"));
        assert!(xml.trim_end().ends_with("</timeSeriesResponse>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let table = FlowTable::<Cms>::new(Vec::new())
            .with_series("flow_avg", Vec::new())
            .unwrap()
            .finish(Precision::default(), TimeFormat::Record);
        let mut q = query();
        q.variable = "a<b".into();
        let xml = values_document(1, &q, &table).unwrap();
        assert!(xml.contains("value=\"a&lt;b\""));
    }
}
