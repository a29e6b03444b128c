use tracing::debug;

use crate::staffing::recon::config::ReconConfig;
use crate::staffing::recon::error::{ReconError, Result};
use crate::staffing::recon::model::{Dataset, ParsedRow, RawRow, RowKey, Sheet};
use crate::staffing::recon::normalize::normalize_address;
use crate::staffing::recon::parse::cells::{cell_text, header_text, parse_date, parse_hours};

/// Column positions recognised in a row-wise header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderColumns {
    pub date: Option<usize>,
    pub hours: Option<usize>,
    pub address: Option<usize>,
    pub city: Option<usize>,
}

impl HeaderColumns {
    /// Names of the mandatory columns that were not found.
    pub fn missing(&self) -> Vec<String> {
        [
            ("date", self.date),
            ("hours", self.hours),
            ("address", self.address),
        ]
        .into_iter()
        .filter(|(_, idx)| idx.is_none())
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

fn is_date_label(text: &str) -> bool {
    text == "дата" || text.starts_with("дата ")
}

fn is_hours_label(text: &str) -> bool {
    text.contains("час") || text.contains("отработ") || text.contains("hours")
}

fn is_address_label(text: &str) -> bool {
    text == "сегмент" || text.contains("адрес") || text.contains("address")
}

/// Maps header labels to column positions. The first matching column wins.
pub fn find_header_columns(header: &RawRow) -> HeaderColumns {
    let mut columns = HeaderColumns::default();

    for (idx, cell) in header.iter().enumerate() {
        let text = header_text(cell);
        if text.is_empty() {
            continue;
        }
        if is_date_label(&text) || text == "день" || text == "период" {
            columns.date.get_or_insert(idx);
        }
        if is_hours_label(&text) {
            columns.hours.get_or_insert(idx);
        }
        if is_address_label(&text) {
            columns.address.get_or_insert(idx);
        }
        if text == "город" {
            columns.city.get_or_insert(idx);
        }
    }

    columns
}

/// Locates the header row of a database export within the first `max_scan`
/// rows.
///
/// A row mentioning a date, an address (or segment) and hours wins outright.
/// Otherwise the row with the best score (one point per marker) is used,
/// ties going to the earliest row.
pub fn detect_header_row(sheet: &Sheet, max_scan: usize) -> usize {
    let scan = &sheet[..sheet.len().min(max_scan)];

    for (idx, row) in scan.iter().enumerate() {
        let joined = row.iter().map(header_text).collect::<Vec<_>>().join(" ");
        if joined.contains("дата")
            && (joined.contains("сегмент") || joined.contains("адрес"))
            && joined.contains("час")
        {
            return idx;
        }
    }

    let mut best_idx = 0;
    let mut best_score = 0;
    for (idx, row) in scan.iter().enumerate() {
        let texts: Vec<String> = row.iter().map(header_text).collect();
        let score = [
            texts.iter().any(|text| is_date_label(text)),
            texts.iter().any(|text| text.contains("час")),
            texts.iter().any(|text| text == "сегмент" || text.contains("адрес")),
        ]
        .into_iter()
        .filter(|hit| *hit)
        .count();

        if score == 3 {
            return idx;
        }
        if score > best_score {
            best_score = score;
            best_idx = idx;
        }
    }

    best_idx
}

/// Picks the column with the most date-like cells in the rows after the
/// header. Requires at least `min_hits` dates.
fn sniff_date_column(sheet: &Sheet, header_idx: usize, config: &ReconConfig) -> Option<usize> {
    let width = sheet[header_idx].len();
    let start = (header_idx + 1).min(sheet.len());
    let end = (header_idx + config.date_sniff_rows).min(sheet.len()).max(start);
    let sample = &sheet[start..end];

    let mut best: Option<(usize, usize)> = None;
    for col in 0..width {
        let hits = sample
            .iter()
            .filter(|row| row.get(col).and_then(parse_date).is_some())
            .count();
        if hits > best.map(|(_, best_hits)| best_hits).unwrap_or(0) {
            best = Some((col, hits));
        }
    }

    best.filter(|(_, hits)| *hits >= config.min_date_hits)
        .map(|(col, _)| col)
}

/// Parses a database export with one `(date, store, hours)` fact per row.
///
/// The address may be split into a city column and a segment column; both
/// the display string and the key are then built as `city, segment`.
pub fn parse_rowwise(sheet: &Sheet, config: &ReconConfig) -> Result<Dataset> {
    if sheet.is_empty() {
        return Ok(Vec::new());
    }

    let header_idx = detect_header_row(sheet, config.header_scan_rows);
    let mut columns = find_header_columns(&sheet[header_idx]);

    if columns.date.is_none() {
        let sniffed =
            sniff_date_column(sheet, header_idx, config).ok_or(ReconError::MissingDateColumn)?;
        debug!(column = sniffed, "date column detected by content");
        columns.date = Some(sniffed);
    }

    let (Some(date_idx), Some(hours_idx), Some(address_idx)) =
        (columns.date, columns.hours, columns.address)
    else {
        return Err(ReconError::MissingColumns(columns.missing()));
    };
    debug!(header_row = header_idx, ?columns, "row-wise header detected");

    let mut rows = Vec::new();
    for row in &sheet[header_idx + 1..] {
        let date = row.get(date_idx).and_then(parse_date);
        let hours = row.get(hours_idx).and_then(parse_hours);

        let segment_raw = cell_text(row.get(address_idx));
        let city_raw = columns
            .city
            .map(|idx| cell_text(row.get(idx)))
            .unwrap_or_default();

        let address_raw = compose_display_address(&city_raw, &segment_raw);
        let address = compose_key_address(&city_raw, &segment_raw, &config.home_city);

        let (Some(date), Some(hours)) = (date, hours) else {
            continue;
        };
        if address.is_empty() || hours.is_zero() {
            continue;
        }

        rows.push(
            ParsedRow::new(RowKey::new(date, address), address_raw, hours).with_source(row.clone()),
        );
    }

    Ok(rows)
}

/// `city, segment` unless the segment already starts with the city.
pub fn compose_display_address(city: &str, segment: &str) -> String {
    let joined = if !city.is_empty()
        && !segment.is_empty()
        && !segment.to_lowercase().starts_with(&city.to_lowercase())
    {
        format!("{city}, {segment}")
    } else if !city.is_empty() && segment.is_empty() {
        city.to_string()
    } else {
        segment.to_string()
    };
    joined.trim().to_string()
}

/// Same composition on normalized parts, normalized once more so the key
/// matches what the full string would produce in a matrix sheet.
pub fn compose_key_address(city: &str, segment: &str, home_city: &str) -> String {
    let city = normalize_address(city, home_city);
    let segment = normalize_address(segment, home_city);
    let joined = if !city.is_empty() && !segment.is_empty() && !segment.starts_with(&city) {
        format!("{city}, {segment}")
    } else if !city.is_empty() && segment.is_empty() {
        city
    } else {
        segment
    };
    normalize_address(&joined, home_city)
}
