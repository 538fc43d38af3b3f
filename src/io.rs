use std::fmt;
use std::fs;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::MeasurementSeries;
use crate::{Error, Result};

/// A CSV column, addressed by its header or by zero-based position
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Column {
    Index(usize),
    Name(String),
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

/// Where each series lives in a CSV file
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    pub x: Column,
    pub y: Column,
    #[serde(default)]
    pub ux: Option<Column>,
    #[serde(default)]
    pub uy: Option<Column>,
    #[serde(default = "has_headers_default")]
    pub has_headers: bool,
}

const fn has_headers_default() -> bool {
    true
}

impl Default for ColumnMapping {
    /// Columns `x, y, ux, uy` in that order, behind a header row
    fn default() -> Self {
        Self {
            x: Column::Index(0),
            y: Column::Index(1),
            ux: None,
            uy: None,
            has_headers: true,
        }
    }
}

impl ColumnMapping {
    #[must_use]
    pub fn new(x: Column, y: Column) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_uncertainties(mut self, ux: Option<Column>, uy: Option<Column>) -> Self {
        self.ux = ux;
        self.uy = uy;
        self
    }

    #[must_use]
    pub fn without_headers(mut self) -> Self {
        self.has_headers = false;
        self
    }

    fn resolve(&self, column: &Column, headers: Option<&StringRecord>) -> Result<usize> {
        match (column, headers) {
            (Column::Index(index), _) => Ok(*index),
            (Column::Name(name), Some(headers)) => headers
                .iter()
                .position(|header| header.trim() == name.as_str())
                .ok_or_else(|| Error::MissingColumn(column.to_string())),
            (Column::Name(_), None) => Err(Error::MissingColumn(column.to_string())),
        }
    }
}

/// Read a measurement series from the CSV file at `path`
///
/// # Errors
/// Returns an error if the file cannot be read, a mapped column is missing or a cell does not
/// hold a number.
pub fn read_series(path: &Path, mapping: &ColumnMapping) -> Result<MeasurementSeries<f64>> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }
    debug!(?path, "reading measurement series");
    let file = fs::read(path)?;
    read_series_from(&file[..], mapping)
}

/// Read a measurement series from CSV data
///
/// # Errors
/// See [`read_series`].
pub fn read_series_from<R: std::io::Read>(
    reader: R,
    mapping: &ColumnMapping,
) -> Result<MeasurementSeries<f64>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(mapping.has_headers)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = if mapping.has_headers {
        Some(rdr.headers()?.clone())
    } else {
        None
    };

    let x_column = mapping.resolve(&mapping.x, headers.as_ref())?;
    let y_column = mapping.resolve(&mapping.y, headers.as_ref())?;
    let ux_column = mapping
        .ux
        .as_ref()
        .map(|column| mapping.resolve(column, headers.as_ref()))
        .transpose()?;
    let uy_column = mapping
        .uy
        .as_ref()
        .map(|column| mapping.resolve(column, headers.as_ref()))
        .transpose()?;

    let (mut x, mut y, mut ux, mut uy) = (vec![], vec![], vec![], vec![]);
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        // Rows are reported one-based, after any header
        let row = row + 1;
        x.push(cell(&record, x_column, row, &mapping.x)?);
        y.push(cell(&record, y_column, row, &mapping.y)?);
        if let (Some(index), Some(column)) = (ux_column, mapping.ux.as_ref()) {
            ux.push(cell(&record, index, row, column)?);
        }
        if let (Some(index), Some(column)) = (uy_column, mapping.uy.as_ref()) {
            uy.push(cell(&record, index, row, column)?);
        }
    }

    debug!(points = x.len(), "measurement series read");

    let mut series = MeasurementSeries::new(x, y);
    if ux_column.is_some() {
        series = series.with_ux(ux);
    }
    if uy_column.is_some() {
        series = series.with_uy(uy);
    }
    Ok(series)
}

fn cell(record: &StringRecord, index: usize, row: usize, column: &Column) -> Result<f64> {
    let value = record
        .get(index)
        .ok_or_else(|| Error::MissingColumn(column.to_string()))?;
    value.parse().map_err(|_| Error::InvalidCell {
        row,
        column: column.to_string(),
        value: value.to_owned(),
    })
}
