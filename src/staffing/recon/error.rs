use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ReconError>;

/// Error type covering the structural failures that abort a reconciliation.
///
/// Per-row problems (an unreadable date, an empty address, zero hours) are
/// never reported here: such rows are skipped by the parsers.
#[derive(Debug, Error)]
pub enum ReconError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON configuration file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook has no sheet to read from.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the matrix sheet has no column whose header mentions an address.
    #[error("address column not found in the matrix header")]
    MissingAddressColumn,

    /// Raised when the matrix header does not carry enough calendar dates.
    #[error("matrix header contains {found} date columns, at least {required} expected")]
    NotEnoughDateColumns { found: usize, required: usize },

    /// Raised when the row-wise sheet has no recognisable date column.
    #[error("unable to detect the date column in the row-wise export")]
    MissingDateColumn,

    /// Raised when mandatory row-wise columns are missing from the header.
    #[error(
        "required columns not found in the row-wise export: {}; \
         expected date, hours and address (the address column may be called 'Сегмент')",
        .0.join(", ")
    )]
    MissingColumns(Vec<String>),

    /// Raised when one side of the comparison has no usable rows at all.
    #[error("{0} dataset contains no usable rows")]
    EmptyDataset(&'static str),

    /// Raised when a configuration value cannot be interpreted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
