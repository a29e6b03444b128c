use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

/// A raw spreadsheet value, detached from the reader that produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell.
    #[default]
    Empty,
    /// Text literal as stored in the sheet.
    Text(String),
    /// Numeric literal.
    Number(f64),
    /// Boolean literal.
    Bool(bool),
    /// Calendar date without a time of day.
    Date(NaiveDate),
    /// Date with a time component.
    DateTime(NaiveDateTime),
    /// Time of day without a date, e.g. a `02:30` duration cell.
    Time(NaiveTime),
}

impl Cell {
    /// Builds a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(value) => f.write_str(value),
            Cell::Number(value) => write!(f, "{value}"),
            Cell::Bool(value) => write!(f, "{value}"),
            Cell::Date(value) => write!(f, "{value}"),
            Cell::DateTime(value) => write!(f, "{value}"),
            Cell::Time(value) => write!(f, "{value}"),
        }
    }
}

/// One spreadsheet row.
pub type RawRow = Vec<Cell>;

/// The rows of a worksheet, top to bottom.
pub type Sheet = Vec<RawRow>;

/// Join key of one store-day fact: the date and the normalized address.
///
/// Ordering is by date first, then address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub date: NaiveDate,
    pub address: String,
}

impl RowKey {
    pub fn new(date: NaiveDate, address: impl Into<String>) -> Self {
        Self {
            date,
            address: address.into(),
        }
    }

    /// Same key under another address.
    pub fn with_address(&self, address: impl Into<String>) -> Self {
        Self::new(self.date, address)
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.date.format("%d.%m.%Y"), self.address)
    }
}

/// A single hours fact extracted from an input sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// Comparison key; `key.address` holds the normalized address.
    pub key: RowKey,
    /// Address as spelled in the source file.
    pub address_raw: String,
    /// Worked hours, quantized to two decimals by the parsers.
    pub hours: Decimal,
    /// Source row kept for diagnostics.
    pub source: RawRow,
}

impl ParsedRow {
    pub fn new(key: RowKey, address_raw: impl Into<String>, hours: Decimal) -> Self {
        Self {
            key,
            address_raw: address_raw.into(),
            hours,
            source: Vec::new(),
        }
    }

    /// Attaches the originating sheet row.
    pub fn with_source(mut self, source: RawRow) -> Self {
        self.source = source;
        self
    }

    /// Copy of the row keyed under another normalized address.
    pub fn rekeyed(&self, address: &str) -> Self {
        Self {
            key: self.key.with_address(address),
            address_raw: self.address_raw.clone(),
            hours: self.hours,
            source: self.source.clone(),
        }
    }
}

/// All rows read from one side of the comparison.
pub type Dataset = Vec<ParsedRow>;

/// Which side of the comparison a dataset comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Customer,
    Database,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Customer => "customer",
            Side::Database => "database",
        }
    }
}

/// A key present on both sides whose totals differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursMismatch {
    pub key: RowKey,
    pub customer: Decimal,
    pub database: Decimal,
    /// `customer - database`, quantized.
    pub delta: Decimal,
}

/// Classification of every key found in either aggregated dataset.
///
/// Each collection is sorted by `(date, address)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    pub only_customer: Vec<(RowKey, Decimal)>,
    pub only_database: Vec<(RowKey, Decimal)>,
    pub differing: Vec<HoursMismatch>,
    /// Keys present on both sides with equal totals.
    pub matched: Vec<(RowKey, Decimal)>,
}

impl DiffResult {
    /// Number of keys that need attention.
    pub fn discrepancy_count(&self) -> usize {
        self.only_customer.len() + self.only_database.len() + self.differing.len()
    }

    pub fn is_clean(&self) -> bool {
        self.discrepancy_count() == 0
    }
}
