//! Label records and the table reader that produces them.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

pub const REQUIRED_COLUMNS: [&str; 3] = ["code", "name", "district"];

/// One label's worth of text. `code` doubles as the barcode payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRecord {
    code: String,
    name: String,
    district: String,
}

impl LabelRecord {
    /// Build a record from manually entered fields. Fields are trimmed
    /// and must not be empty.
    pub fn new(code: &str, name: &str, district: &str) -> Result<Self> {
        Ok(LabelRecord {
            code: manual("code", code)?,
            name: manual("name", name)?,
            district: manual("district", district)?,
        })
    }

    /// A manually entered record for layouts that print no district,
    /// such as the captioned computer sticker.
    pub fn without_district(code: &str, name: &str) -> Result<Self> {
        Ok(LabelRecord {
            code: manual("code", code)?,
            name: manual("name", name)?,
            district: String::new(),
        })
    }

    fn from_row(row: usize, code: &str, name: &str, district: &str) -> Result<Self> {
        let field = |column: &'static str, value: &str| {
            required(value).ok_or(StickerError::EmptyField { row, column })
        };
        Ok(LabelRecord {
            code: field("code", code)?,
            name: field("name", name)?,
            district: field("district", district)?,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn district(&self) -> &str {
        &self.district
    }
}

fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn manual(field: &'static str, value: &str) -> Result<String> {
    required(value).ok_or(StickerError::MissingInput { field })
}

/// Normalize a header cell: trim, lowercase, drop all whitespace
/// (and a spreadsheet-exported byte order mark).
pub fn normalize_column(name: &str) -> String {
    name.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Read records from a comma-separated table with a header row.
///
/// Header names are matched after [`normalize_column`], so `" Code "`,
/// `"CODE"` and `"Dis trict"` all resolve. Extra columns are ignored.
/// Rows whose cells are all empty are skipped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<LabelRecord>> {
    let mut table = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let detected: Vec<String> = table.headers()?.iter().map(str::to_string).collect();
    let normalized: Vec<String> = detected.iter().map(|h| normalize_column(h)).collect();

    let mut indices = [0usize; 3];
    let mut missing = Vec::new();
    for (slot, required) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
        match normalized.iter().position(|h| h == required) {
            Some(i) => *slot = i,
            None => missing.push(required.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(StickerError::MissingColumns { missing, detected });
    }

    let mut records = Vec::new();
    for (i, row) in table.records().enumerate() {
        let row = row?;
        // Header is spreadsheet row 1.
        let row_number = i + 2;
        let cell = |idx: usize| row.get(idx).unwrap_or("");
        if row.iter().all(|c| c.trim().is_empty()) {
            debug!("skipping blank row {}", row_number);
            continue;
        }
        records.push(LabelRecord::from_row(
            row_number,
            cell(indices[0]),
            cell(indices[1]),
            cell(indices[2]),
        )?);
    }
    debug!("read {} records", records.len());
    Ok(records)
}

/// Read records from a CSV file on disk.
pub fn read_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<LabelRecord>> {
    let file = File::open(path)?;
    read_records(file)
}
