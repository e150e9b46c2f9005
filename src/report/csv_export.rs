//! CSV export of conversion results

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;

use crate::symbology::{cell_text, ConversionResult};

/// Written in place of null cells
pub const CSV_NULL: &str = "NULL";

/// One CSV line as a single-row DataFrame.
///
/// Columns get positional names, so duplicate or blank titles are fine.
fn record_frame(cells: &[Option<String>]) -> Result<DataFrame> {
    let columns: Vec<Column> = cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| Column::new(format!("c{}", idx).into(), vec![cell.clone()]))
        .collect();

    DataFrame::new(columns).context("Failed to build CSV record")
}

/// Cells of every line of the export: header titles, then one line per row.
///
/// Rows shorter than the header list are padded with nulls; longer rows keep
/// every cell.
pub fn csv_records(result: &ConversionResult) -> Vec<Vec<Option<String>>> {
    let width = result.headers.len();
    let titles = result
        .headers
        .iter()
        .map(|header| Some(header.title.clone()))
        .collect();

    std::iter::once(titles)
        .chain(result.data.iter().map(|row| {
            let mut cells: Vec<Option<String>> = row.iter().map(cell_text).collect();
            if cells.len() < width {
                cells.resize(width, None);
            }
            cells
        }))
        .collect()
}

/// Write header titles and data rows to `path`, nulls as `NULL`.
pub fn export_csv(result: &ConversionResult, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;

    for cells in csv_records(result) {
        if cells.is_empty() {
            writeln!(file)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
            continue;
        }
        let mut df = record_frame(&cells)?;
        CsvWriter::new(&mut file)
            .include_header(false)
            .with_null_value(CSV_NULL.to_string())
            .finish(&mut df)
            .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    }
    Ok(())
}
