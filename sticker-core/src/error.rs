use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::barcode::BarcodeError;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum StickerError {
    /// Required columns absent after header normalization.
    #[error("missing required column(s) {missing:?}; detected columns: {detected:?}")]
    MissingColumns {
        missing: Vec<String>,
        detected: Vec<String>,
    },

    /// A data row has some, but not all, required cells empty.
    #[error("row {row}: required field `{column}` is empty")]
    EmptyField { row: usize, column: &'static str },

    /// A manually entered field is blank.
    #[error("`{field}` must not be empty")]
    MissingInput { field: &'static str },

    /// Barcode payload cannot be expressed in Code128.
    #[error("record {index} (code {code:?}) cannot be encoded: {source}")]
    Encoding {
        index: usize,
        code: String,
        #[source]
        source: BarcodeError,
    },

    /// Single-label output given zero or several records.
    #[error("expected {expected} record(s), got {found}")]
    RecordCount { expected: usize, found: usize },

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("failed to read input table: {0}")]
    Table(#[from] csv::Error),

    #[error("failed to build archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to encode PNG: {0}")]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Invalid physical sizes, detected before any record is rendered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{what} must be a positive, finite number (got {value})")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error(
        "label {label_width}x{label_height}cm does not fit on page \
         {page_width}x{page_height}cm ({columns} columns x {rows} rows)"
    )]
    LabelLargerThanPage {
        label_width: f64,
        label_height: f64,
        page_width: f64,
        page_height: f64,
        columns: u32,
        rows: u32,
    },

    #[error("barcode {field} must be between {min} and {max} (got {value})")]
    BarcodeOption {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },

    #[error("cannot allocate a {width}x{height} pixel canvas")]
    Canvas { width: u32, height: u32 },
}

/// Logo could not be used. Callers render without a logo.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("cannot read logo {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode logo: {0}")]
    Decode(#[from] image::ImageError),
}

/// TrueType font could not be used. Callers fall back to the
/// built-in bitmap font.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("cannot read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse font {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, StickerError>;
