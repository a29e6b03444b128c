use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::staffing::recon::error::{ReconError, Result};
use crate::staffing::recon::model::{Cell, RawRow, Sheet};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Reads the first worksheet of an `.xlsx` file.
pub fn read_first_sheet(path: &Path) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    read_workbook(&mut workbook)
}

/// Reads the first worksheet of an in-memory `.xlsx` document.
pub fn read_first_sheet_from_bytes(bytes: &[u8]) -> Result<Sheet> {
    let mut workbook = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    read_workbook(&mut workbook)
}

fn read_workbook<R: Read + Seek>(workbook: &mut Xlsx<R>) -> Result<Sheet> {
    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconError::InvalidWorkbook("workbook has no sheets".into()))?;
    let range = workbook
        .worksheet_range(&name)
        .ok_or_else(|| ReconError::InvalidWorkbook(format!("missing sheet '{name}'")))?
        .map_err(ReconError::from)?;
    Ok(range_to_sheet(&range))
}

/// Converts a calamine range into rows addressed from `A1`.
///
/// calamine trims leading empty rows and columns; they are restored so that
/// "first row" and column positions mean the same as in the spreadsheet.
fn range_to_sheet(range: &Range<DataType>) -> Sheet {
    let Some((row_offset, col_offset)) = range.start() else {
        return Vec::new();
    };

    let mut sheet: Sheet = vec![Vec::new(); row_offset as usize];
    for row in range.rows() {
        let mut cells: RawRow = vec![Cell::Empty; col_offset as usize];
        cells.extend(row.iter().map(convert_cell));
        sheet.push(cells);
    }
    sheet
}

fn convert_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(value) => Cell::Text(value.clone()),
        DataType::Float(value) => Cell::Number(*value),
        DataType::Int(value) => Cell::Number(*value as f64),
        DataType::Bool(value) => Cell::Bool(*value),
        DataType::DateTime(serial) => serial_to_cell(*serial),
        other => {
            let text = other.to_string();
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S")
                .map(Cell::DateTime)
                .unwrap_or(Cell::Text(text))
        }
    }
}

/// Interprets an Excel serial number (1900 date system).
///
/// A purely fractional serial is a time of day, a whole one a date.
pub fn serial_to_cell(serial: f64) -> Cell {
    if !serial.is_finite() || serial < 0.0 {
        return Cell::Number(serial);
    }

    let mut days = serial.trunc() as i64;
    let mut seconds = (serial.fract() * SECONDS_PER_DAY).round() as u32;
    if seconds >= SECONDS_PER_DAY as u32 {
        days += 1;
        seconds = 0;
    }

    let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) else {
        return Cell::Number(serial);
    };
    if days == 0 {
        return Cell::Time(time);
    }

    let Some(date) = excel_epoch().checked_add_signed(Duration::days(days)) else {
        return Cell::Number(serial);
    };
    if seconds == 0 {
        Cell::Date(date)
    } else {
        Cell::DateTime(date.and_time(time))
    }
}

/// Serial number of a date in the 1900 date system.
pub fn date_to_serial(date: NaiveDate) -> f64 {
    (date - excel_epoch()).num_days() as f64
}

fn excel_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}
