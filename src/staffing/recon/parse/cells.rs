use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use regex::Regex;
use rust_decimal::Decimal;

use crate::staffing::recon::aggregate::quantize;
use crate::staffing::recon::model::Cell;
use crate::staffing::recon::normalize::fold_text;

const DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%Y-%m-%d", "%d/%m/%Y", "%d.%m.%y"];
const DATETIME_FORMATS: &[&str] = &["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"];

static SHORT_DAY_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})$").expect("day.month pattern"));

/// Reads an hours value.
///
/// Numbers are quantized to two decimals, times of day become
/// `hours + minutes / 60`, text accepts a comma decimal separator and treats a
/// lone dash as "no value". Anything else yields `None`.
pub fn parse_hours(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => None,
        Cell::Time(time) => Some(time_to_hours(*time)),
        Cell::DateTime(value) => Some(time_to_hours(value.time())),
        Cell::Number(value) => {
            if !value.is_finite() {
                return None;
            }
            parse_decimal(&value.to_string()).map(quantize)
        }
        Cell::Text(value) => {
            let trimmed = value.trim();
            if trimmed == "-" || trimmed == "—" {
                return None;
            }
            parse_decimal(&trimmed.replace(',', ".")).map(quantize)
        }
    }
}

fn time_to_hours(time: NaiveTime) -> Decimal {
    let minutes = Decimal::from(time.minute()) / Decimal::from(60);
    quantize(Decimal::from(time.hour()) + minutes)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Reads a calendar date from a date cell or from text in one of the
/// supported day-first formats.
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(date) => Some(*date),
        Cell::DateTime(value) => Some(value.date()),
        Cell::Text(value) => parse_date_text(value.trim()),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if has_plausible_year(format, date) {
                return Some(date);
            }
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            if has_plausible_year(format, value.date()) {
                return Some(value.date());
            }
        }
    }
    None
}

/// `%Y` must consume a four digit year, otherwise `01.02.24` would be read as
/// year 24 instead of falling through to `%y`.
fn has_plausible_year(format: &str, date: NaiveDate) -> bool {
    !format.contains("%Y") || (1000..=9999).contains(&date.year())
}

/// Reads a matrix header cell: any [`parse_date`] value or a short `D.M` text
/// resolved against `default_year`. Impossible dates such as `31.2` yield
/// `None`.
pub fn parse_header_date(cell: &Cell, default_year: i32) -> Option<NaiveDate> {
    if let Some(date) = parse_date(cell) {
        return Some(date);
    }
    let Cell::Text(value) = cell else {
        return None;
    };
    let caps = SHORT_DAY_MONTH.captures(value.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    NaiveDate::from_ymd_opt(default_year, month, day)
}

/// Folded text of a cell, used to match header labels.
pub fn header_text(cell: &Cell) -> String {
    fold_text(&cell.to_string())
}

/// Trimmed display text of a cell.
pub fn cell_text(cell: Option<&Cell>) -> String {
    cell.map(|cell| cell.to_string().trim().to_string())
        .unwrap_or_default()
}
