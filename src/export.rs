use std::fs;
use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;

use crate::error::{ImportError, ImportResult};
use crate::models::ImportRecord;

/// Column names expected in IMDb list exports (ratings.csv, watchlist.csv)
pub const TITLE_COLUMN: &str = "Title";
pub const TITLE_TYPE_COLUMN: &str = "Title Type";
pub const YEAR_COLUMN: &str = "Year";

const REQUIRED_COLUMNS: [&str; 3] = [TITLE_COLUMN, TITLE_TYPE_COLUMN, YEAR_COLUMN];

/// Positions of the required columns within the header row
struct ExportColumns {
    title: usize,
    title_type: usize,
    year: usize,
}

/// Reads an IMDb export file into records.
///
/// IMDb exports are ISO-8859-1 encoded, not UTF-8; decoding with the wrong
/// charset corrupts accented titles, so the file is decoded as Windows-1252
/// before CSV parsing.
pub fn read_export(path: &Path) -> ImportResult<Vec<ImportRecord>> {
    if !path.exists() {
        return Err(ImportError::ExportNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    parse_export(&bytes, path)
}

/// Parses raw export bytes: decode, validate the header, extract rows.
///
/// Any missing required column is fatal for the whole run. Individual rows
/// that fail to parse are logged and dropped; one bad row must not stop the
/// batch.
pub fn parse_export(bytes: &[u8], origin: &Path) -> ImportResult<Vec<ImportRecord>> {
    let (text, _, _) = WINDOWS_1252.decode(bytes);

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ImportError::EmptyExport(origin.to_path_buf()));
    }

    let columns = locate_columns(&headers)?;

    let mut records = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // Header is line 1, so data row N is line N + 1
        let line = index + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!(line, error = %e, "Failed to parse export row, skipping");
                continue;
            }
        };

        // Short records are tolerated: a missing cell reads as empty
        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        records.push(ImportRecord {
            title: field(columns.title),
            title_type: field(columns.title_type),
            year: field(columns.year),
        });
    }

    Ok(records)
}

fn locate_columns(headers: &csv::StringRecord) -> ImportResult<ExportColumns> {
    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| position(name).is_none())
        .map(|name| name.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            missing,
            available: headers.iter().map(str::to_string).collect(),
        });
    }

    Ok(ExportColumns {
        title: position(TITLE_COLUMN).unwrap(),
        title_type: position(TITLE_TYPE_COLUMN).unwrap(),
        year: position(YEAR_COLUMN).unwrap(),
    })
}
