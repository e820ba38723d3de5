//! Tabular input.
//!
//! Reads a workbook or delimited text file into a [`Dataset`]. The first
//! non-blank row is the header: the category column and the five value
//! columns are found by matching header cells against the configured
//! category column name and point values.

mod csv;
mod xlsx;

use std::path::Path;
use tracing::{debug, info};

use crate::config::DeckConfig;
use crate::error::{DeckError, Result};
use crate::types::{Dataset, DatasetRow};

use self::csv::Delimiter;

/// Rows of display strings, in source order.
pub(crate) type Grid = Vec<Vec<String>>;

/// How to read the input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Worksheet to read; the first sheet when `None`. Ignored for CSV/TSV.
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Workbook,
    Delimited(Delimiter),
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" => Some(Format::Workbook),
            "csv" => Some(Format::Delimited(Delimiter::Comma)),
            "tsv" | "tab" => Some(Format::Delimited(Delimiter::Tab)),
            _ => None,
        }
    }
}

/// Read `path` into a dataset.
///
/// Any failure to open or interpret the file is a
/// [`DeckError::SourceRead`]; a header with no data rows under it is
/// [`DeckError::EmptyDataset`].
pub fn read_dataset(path: &Path, options: &SourceOptions, config: &DeckConfig) -> Result<Dataset> {
    let format = Format::from_path(path).ok_or_else(|| {
        DeckError::source_read(path, "unsupported file type (expected .xlsx, .xlsm, .csv or .tsv)")
    })?;
    let data = std::fs::read(path).map_err(|e| DeckError::source_read(path, e))?;

    let grid = match format {
        Format::Workbook => xlsx::read_grid(path, &data, options.sheet.as_deref()),
        Format::Delimited(delim) => Ok(csv::read_grid(&data, delim)),
    }
    .map_err(|e| match e {
        e @ DeckError::SourceRead { .. } => e,
        other => DeckError::source_read(path, other),
    })?;

    let dataset = dataset_from_grid(path, grid, config)?;
    info!(path = %path.display(), rows = dataset.len(), "read dataset");
    Ok(dataset)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

fn column_of(header: &[String], name: &str) -> Option<usize> {
    header.iter().position(|cell| cell.trim() == name)
}

/// Pick the category and value columns out of `grid`.
///
/// Value headers missing from the sheet leave rows short, which the planner
/// reports as a malformed row.
pub(crate) fn dataset_from_grid(path: &Path, grid: Grid, config: &DeckConfig) -> Result<Dataset> {
    let mut rows = grid.into_iter().enumerate().filter(|(index, row)| {
        let blank = is_blank(row);
        if blank {
            debug!(row = index + 1, "skipping blank row");
        }
        !blank
    });

    let (_, header) = rows
        .next()
        .ok_or_else(|| DeckError::source_read(path, "no header row"))?;
    let category_col = column_of(&header, &config.category_column).ok_or_else(|| {
        DeckError::source_read(
            path,
            format!("no {:?} column in header", config.category_column),
        )
    })?;
    let value_cols: Vec<usize> = config
        .value_headers()
        .iter()
        .filter_map(|name| {
            let col = column_of(&header, name);
            if col.is_none() {
                debug!(header = %name, "value column missing");
            }
            col
        })
        .collect();

    let cell = |row: &[String], col: usize| {
        row.get(col)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    };
    let dataset = Dataset::new(
        rows.map(|(_, row)| {
            DatasetRow::new(
                cell(row.as_slice(), category_col),
                value_cols.iter().map(|&col| cell(row.as_slice(), col)),
            )
        })
        .collect(),
    );

    if dataset.is_empty() {
        return Err(DeckError::EmptyDataset);
    }
    Ok(dataset)
}
