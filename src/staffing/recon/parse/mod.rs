//! Turns raw sheets into [`Dataset`]s.
//!
//! Two layouts exist: the customer's matrix (stores × days) and the database
//! export (one fact per row, header somewhere in the first rows).
//! [`parse_sheet`] picks the parser by counting date-like header cells.

pub mod cells;
pub mod matrix;
pub mod rowwise;

use tracing::info;

use crate::staffing::recon::config::ReconConfig;
use crate::staffing::recon::error::Result;
use crate::staffing::recon::model::{Dataset, Sheet};

pub use cells::{parse_date, parse_header_date, parse_hours};
pub use matrix::parse_matrix;
pub use rowwise::{HeaderColumns, detect_header_row, find_header_columns, parse_rowwise};

/// Layout of an input sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Matrix,
    RowWise,
}

/// Chooses the layout from the first row: enough date-like cells mean matrix.
/// Returns `None` for an empty sheet.
pub fn detect_format(sheet: &Sheet, config: &ReconConfig) -> Option<SheetFormat> {
    let header = sheet.first()?;
    let date_like = matrix::date_columns(header, config.default_year).len();
    if date_like >= config.min_matrix_date_columns {
        Some(SheetFormat::Matrix)
    } else {
        Some(SheetFormat::RowWise)
    }
}

/// Parses a sheet with the parser matching its detected layout.
pub fn parse_sheet(sheet: &Sheet, config: &ReconConfig) -> Result<Dataset> {
    let Some(format) = detect_format(sheet, config) else {
        return Ok(Vec::new());
    };
    let rows = match format {
        SheetFormat::Matrix => parse_matrix(sheet, config)?,
        SheetFormat::RowWise => parse_rowwise(sheet, config)?,
    };
    info!(?format, row_count = rows.len(), "sheet parsed");
    Ok(rows)
}
