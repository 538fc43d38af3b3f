use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::analysis::FitResult;
use crate::Result;

/// One point of a fit, in original and linearized coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TableRow<E> {
    pub x: E,
    pub y: E,
    pub x_lin: E,
    pub y_lin: E,
    pub ux_lin: E,
    pub uy_lin: E,
    pub y_fit: E,
    pub residual: E,
}

/// Per-point rows of a fit, in input order
pub fn table<E: Copy>(result: &FitResult<E>) -> Vec<TableRow<E>> {
    let data = result.data();
    (0..data.x_lin.len())
        .map(|i| TableRow {
            x: data.x[i],
            y: data.y[i],
            x_lin: data.x_lin[i],
            y_lin: data.y_lin[i],
            ux_lin: data.ux_lin[i],
            uy_lin: data.uy_lin[i],
            y_fit: data.fitted[i],
            residual: data.residuals[i],
        })
        .collect()
}

/// Write the per-point table of `result` as CSV, with a header row
///
/// # Errors
/// Returns an error if serialisation or the underlying writer fails.
pub fn write_csv<E: Copy + Serialize, W: Write>(result: &FitResult<E>, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in table(result) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the per-point table of `result` to a CSV file at `path`
///
/// # Errors
/// See [`write_csv`].
pub fn write_csv_file<E: Copy + Serialize>(result: &FitResult<E>, path: &Path) -> Result<()> {
    debug!(?path, "exporting fit table");
    write_csv(result, File::create(path)?)
}
