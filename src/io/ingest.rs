//! Sieve data ingest.
//!
//! Two entry points:
//! - [`parse_number_list`]: a comma-separated list as typed by a user
//!   (`"4.75, 3.35, 2.36"`)
//! - [`load_series_csv`]: a two-column CSV of sieve size and cumulative passing
//!
//! Design goals:
//! - **Strict**: a malformed token or row is an error naming what was wrong
//! - **No fitting logic here**: output is a validated [`SampleSeries`]

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::SampleSeries;
use crate::error::AppError;

/// Accepted header names for the sieve-size column.
const SIZE_HEADERS: [&str; 4] = ["size", "sieve_size", "sieve", "x"];
/// Accepted header names for the cumulative-passing column.
const PASSING_HEADERS: [&str; 5] = ["passing", "cum_passing", "cumulative_passing", "passing_pct", "y"];

/// Parse a comma-separated list of numbers.
///
/// At least one comma is required: a single bare number is almost always a
/// typo for a list.
pub fn parse_number_list(text: &str) -> Result<Vec<f64>, AppError> {
    if !text.contains(',') {
        return Err(AppError::input_shape(
            "Please enter the data using commas in between values.",
        ));
    }

    text.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            if token.is_empty() {
                return Err(AppError::input_shape(format!("Empty value at position {}.", i + 1)));
            }
            token.parse::<f64>().map_err(|_| {
                AppError::input_shape(format!("Invalid number '{token}' at position {}.", i + 1))
            })
        })
        .collect()
}

/// Build a series from two comma-separated lists.
pub fn series_from_lists(sizes: &str, passing: &str) -> Result<SampleSeries, AppError> {
    SampleSeries::new(parse_number_list(sizes)?, parse_number_list(passing)?)
}

/// Load a sieve analysis from CSV.
pub fn load_series_csv(path: &Path) -> Result<SampleSeries, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(b'#'))
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let size_idx = find_column(&header_map, &SIZE_HEADERS)?;
    let passing_idx = find_column(&header_map, &PASSING_HEADERS)?;

    let mut sizes = Vec::new();
    let mut passing = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::io(format!("CSV parse error on line {line}: {e}")))?;
        sizes.push(parse_cell(&record, size_idx, line)?);
        passing.push(parse_cell(&record, passing_idx, line)?);
    }

    tracing::debug!(path = %path.display(), rows = sizes.len(), "sieve csv loaded");
    SampleSeries::new(sizes, passing)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn find_column(header_map: &HashMap<String, usize>, names: &[&str]) -> Result<usize, AppError> {
    names
        .iter()
        .find_map(|n| header_map.get(*n).copied())
        .ok_or_else(|| {
            AppError::input_shape(format!(
                "Missing required column: one of `{}`.",
                names.join("`, `")
            ))
        })
}

fn parse_cell(record: &StringRecord, idx: usize, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| AppError::input_shape(format!("Line {line}: missing value.")))?;
    raw.parse::<f64>()
        .map_err(|_| AppError::input_shape(format!("Line {line}: invalid number '{raw}'.")))
}
