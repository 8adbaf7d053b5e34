//! Time-indexed flow tables.
//!
//! A [`FlowTable`] is the working shape inside the engine: named series over
//! one shared index, tagged with a unit type. Finishing a table rounds it and
//! produces a [`ResultTable`], which only knows its runtime [`Units`] and can
//! no longer be converted.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{HydroError, HydroResult};
use crate::precision::Precision;
use crate::time::TimeFormat;
use crate::units::{Cfs, Cms, Flow, FlowUnit, Units};

/// A named column of values aligned to a table index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Named flow series sharing one time index.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTable<U: FlowUnit> {
    index: Vec<DateTime<Utc>>,
    series: Vec<Series>,
    unit: PhantomData<U>,
}

impl<U: FlowUnit> FlowTable<U> {
    pub fn new(index: Vec<DateTime<Utc>>) -> Self {
        Self {
            index,
            series: Vec::new(),
            unit: PhantomData,
        }
    }

    /// Add a series. Its length must match the index.
    pub fn push_series(&mut self, name: impl Into<String>, values: Vec<f64>) -> HydroResult<()> {
        let name = name.into();
        if values.len() != self.index.len() {
            return Err(HydroError::data_integrity(format!(
                "series '{}' has {} values for an index of {}",
                name,
                values.len(),
                self.index.len()
            )));
        }
        self.series.push(Series { name, values });
        Ok(())
    }

    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> HydroResult<Self> {
        self.push_series(name, values)?;
        Ok(self)
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn units(&self) -> Units {
        U::UNITS
    }

    /// Keep only the series whose name satisfies the predicate.
    pub fn retain_series<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.series.retain(|s| keep(&s.name));
    }

    /// Keep only the rows whose timestamp satisfies the predicate.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&DateTime<Utc>) -> bool,
    {
        let mask: Vec<bool> = self.index.iter().map(&mut keep).collect();
        self.apply_mask(&mask);
    }

    /// Drop every row where any series holds a non-finite value.
    pub fn drop_incomplete_rows(&mut self) {
        let mask: Vec<bool> = (0..self.index.len())
            .map(|row| self.series.iter().all(|s| s.values[row].is_finite()))
            .collect();
        self.apply_mask(&mask);
    }

    fn apply_mask(&mut self, mask: &[bool]) {
        retain_by_mask(&mut self.index, mask);
        for series in &mut self.series {
            retain_by_mask(&mut series.values, mask);
        }
    }

    fn map_values<V: FlowUnit>(self, f: impl Fn(f64) -> f64) -> FlowTable<V> {
        FlowTable {
            index: self.index,
            series: self
                .series
                .into_iter()
                .map(|s| Series {
                    name: s.name,
                    values: s.values.into_iter().map(&f).collect(),
                })
                .collect(),
            unit: PhantomData,
        }
    }

    /// Round every value and seal the table for output.
    pub fn finish(self, precision: Precision, time_format: TimeFormat) -> ResultTable {
        let units = U::UNITS;
        let table: FlowTable<U> = self.map_values(|v| precision.round(v));
        ResultTable {
            units,
            time_format,
            index: table.index,
            columns: table.series,
        }
    }
}

impl FlowTable<Cms> {
    pub fn into_cfs(self) -> FlowTable<Cfs> {
        self.map_values(|v| Flow::<Cms>::new(v).into_cfs().value())
    }

    /// Convert to the requested units (at most once) then finish.
    pub fn finish_in(self, units: Units, precision: Precision, time_format: TimeFormat) -> ResultTable {
        match units {
            Units::Cms => self.finish(precision, time_format),
            Units::Cfs => self.into_cfs().finish(precision, time_format),
        }
    }
}

impl FlowTable<Cfs> {
    pub fn into_cms(self) -> FlowTable<Cms> {
        self.map_values(|v| Flow::<Cfs>::new(v).into_cms().value())
    }
}

fn retain_by_mask<T>(values: &mut Vec<T>, mask: &[bool]) {
    let mut keep = mask.iter();
    values.retain(|_| keep.next().copied().unwrap_or(false));
}

/// A converted, rounded table ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    units: Units,
    time_format: TimeFormat,
    index: Vec<DateTime<Utc>>,
    columns: Vec<Series>,
}

impl ResultTable {
    pub fn units(&self) -> Units {
        self.units
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Timestamps rendered with this table's time format.
    pub fn formatted_index(&self) -> Vec<String> {
        self.index.iter().map(|dt| self.time_format.format(dt)).collect()
    }

    /// Raw series, names without the units suffix.
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    /// Output column name for a series, e.g. `flow_max_cfs`.
    pub fn column_label(&self, series: &Series) -> String {
        format!("{}_{}", series.name, self.units.label())
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.columns.iter().map(|s| self.column_label(s)).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<&DateTime<Utc>> {
        self.index.first()
    }

    pub fn last_timestamp(&self) -> Option<&DateTime<Utc>> {
        self.index.last()
    }
}
