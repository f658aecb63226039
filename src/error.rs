use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ListError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests orders, loads the category map, or emits the report workbook.
///
/// Parsing the free-text product info never raises: unparseable fields degrade
/// to their documented defaults instead (see [`crate::extract`]).
#[derive(Debug, Error)]
pub enum ListError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization of the category map fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the orders workbook does not follow the expected layout.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a required header column is absent from the orders sheet.
    #[error("missing required column '{0}' in orders sheet")]
    MissingColumn(String),

    /// Raised when the same alias is configured under two categories.
    #[error("alias '{alias}' is mapped to both '{first}' and '{second}'")]
    AliasOverlap {
        alias: String,
        first: String,
        second: String,
    },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when refusing to overwrite an existing file.
    #[error("refusing to overwrite existing file: {0}")]
    AlreadyExists(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
