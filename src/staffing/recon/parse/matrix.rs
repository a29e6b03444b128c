use chrono::NaiveDate;
use tracing::debug;

use crate::staffing::recon::config::ReconConfig;
use crate::staffing::recon::error::{ReconError, Result};
use crate::staffing::recon::model::{Cell, Dataset, ParsedRow, RowKey, Sheet};
use crate::staffing::recon::normalize::normalize_address;
use crate::staffing::recon::parse::cells::{cell_text, header_text, parse_header_date, parse_hours};

/// Columns of the matrix header holding calendar dates.
pub fn date_columns(header: &[Cell], default_year: i32) -> Vec<(usize, NaiveDate)> {
    header
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| parse_header_date(cell, default_year).map(|date| (idx, date)))
        .collect()
}

/// Parses a customer sheet shaped as stores × days.
///
/// The first row is the header: one column mentions the address, the
/// date-like ones are days. Every non-empty, non-zero hours cell becomes one
/// [`ParsedRow`].
pub fn parse_matrix(sheet: &Sheet, config: &ReconConfig) -> Result<Dataset> {
    let Some((header, body)) = sheet.split_first() else {
        return Ok(Vec::new());
    };

    let address_idx = header
        .iter()
        .position(|cell| header_text(cell).contains("адрес"))
        .ok_or(ReconError::MissingAddressColumn)?;

    let days = date_columns(header, config.default_year);
    if days.len() < config.min_matrix_date_columns {
        return Err(ReconError::NotEnoughDateColumns {
            found: days.len(),
            required: config.min_matrix_date_columns,
        });
    }
    debug!(address_column = address_idx, day_columns = days.len(), "matrix header detected");

    let mut rows = Vec::new();
    for row in body {
        let address_raw = cell_text(row.get(address_idx));
        let address = normalize_address(&address_raw, &config.home_city);
        if address.is_empty() {
            continue;
        }

        for (col_idx, date) in &days {
            let Some(hours) = row.get(*col_idx).and_then(parse_hours) else {
                continue;
            };
            if hours.is_zero() {
                continue;
            }
            rows.push(
                ParsedRow::new(RowKey::new(*date, address.clone()), address_raw.clone(), hours)
                    .with_source(row.clone()),
            );
        }
    }

    Ok(rows)
}
