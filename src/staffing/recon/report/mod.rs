//! Builds the two-sheet discrepancy report.
//!
//! `Report` holds one row per store, grouped by the loose
//! [`report_key`](crate::staffing::recon::normalize::report_key) and ordered by
//! the size of the discrepancy. `Differences` lists every `(date, address)`
//! key that does not reconcile, ordered per store.

pub mod text;

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::staffing::recon::aggregate::{accumulate, aggregate_by_address, quantize};
use crate::staffing::recon::config::ReconConfig;
use crate::staffing::recon::model::{DiffResult, ParsedRow, RowKey};
use crate::staffing::recon::normalize::report_key;

pub use text::render_text_summary;

/// Sheet name of the per-store summary.
pub const REPORT_SHEET: &str = "Report";
/// Sheet name of the per-key detail.
pub const DIFFERENCES_SHEET: &str = "Differences";

/// Header background.
pub const HEADER_FILL: u32 = 0xE6E6E6;
/// Background of the hour columns in the summary.
pub const HOURS_FILL: u32 = 0xC6EFCE;
/// Background of critical detail rows.
pub const CRITICAL_FILL: u32 = 0xFFCCCC;
/// Background of non-critical detail rows.
pub const MINOR_FILL: u32 = 0xFFF2CC;

const REPORT_COLUMNS: [(&str, f64); 4] = [
    ("адреса", 65.0),
    ("заказчик", 12.0),
    ("база", 12.0),
    ("расхождения", 14.0),
];

const DIFFERENCES_COLUMNS: [(&str, f64); 9] = [
    ("Адрес (как у Заказчика)", 55.0),
    ("Адрес (как в Базе)", 55.0),
    ("Ключ (норм.)", 55.0),
    ("Дата", 12.0),
    ("Часы (Заказчик)", 16.0),
    ("Часы (База)", 14.0),
    ("Дельта", 10.0),
    ("Статус", 18.0),
    ("Критично", 10.0),
];

/// One store in the summary sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub address: String,
    pub customer: Decimal,
    pub database: Decimal,
    pub delta: Decimal,
}

/// Why a detail row is listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailStatus {
    OnlyCustomer,
    OnlyDatabase,
    HoursDiffer,
}

impl DetailStatus {
    pub fn label(self) -> &'static str {
        match self {
            DetailStatus::OnlyCustomer => "Только у Заказчика",
            DetailStatus::OnlyDatabase => "Только в Базе",
            DetailStatus::HoursDiffer => "Разные часы",
        }
    }
}

/// One discrepancy in the detail sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub customer_address: Option<String>,
    pub database_address: Option<String>,
    pub key: RowKey,
    pub customer: Option<Decimal>,
    pub database: Option<Decimal>,
    pub delta: Option<Decimal>,
    pub status: DetailStatus,
    pub critical: bool,
}

/// A value written into a report cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl CellValue {
    fn text_or_blank(value: Option<&str>) -> Self {
        match value {
            Some(text) if !text.is_empty() => CellValue::Text(text.to_string()),
            _ => CellValue::Blank,
        }
    }

    fn hours(value: Option<Decimal>) -> Self {
        value
            .and_then(|hours| hours.to_f64())
            .map(CellValue::Number)
            .unwrap_or(CellValue::Blank)
    }
}

/// A report cell with its optional background colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCell {
    pub value: CellValue,
    pub fill: Option<u32>,
}

impl ReportCell {
    fn plain(value: CellValue) -> Self {
        Self { value, fill: None }
    }

    fn filled(value: CellValue, fill: u32) -> Self {
        Self {
            value,
            fill: Some(fill),
        }
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub widths: Vec<f64>,
    pub rows: Vec<Vec<ReportCell>>,
}

impl SheetTable {
    fn new<const N: usize>(sheet_name: &str, columns: [(&str, f64); N]) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
            widths: columns.iter().map(|(_, width)| *width).collect(),
            rows: Vec::new(),
        }
    }
}

/// All tables of the report workbook, in sheet order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportWorkbook {
    pub tables: Vec<SheetTable>,
}

/// First raw spelling seen for every normalized address, customer rows first.
fn display_addresses(customer: &[ParsedRow], database: &[ParsedRow]) -> BTreeMap<String, String> {
    let mut display = BTreeMap::new();
    for row in customer.iter().chain(database) {
        display
            .entry(row.key.address.clone())
            .or_insert_with(|| row.address_raw.clone());
    }
    display
}

struct SummaryGroup {
    display: String,
    customer: Decimal,
    database: Decimal,
}

/// Per-store totals grouped by report key.
///
/// The displayed address is the shortest raw spelling in the group. Rows are
/// sorted by absolute delta, largest first, then by address.
pub fn build_summary_rows(
    customer: &[ParsedRow],
    database: &[ParsedRow],
    home_city: &str,
) -> Vec<SummaryRow> {
    let customer_totals = aggregate_by_address(customer);
    let database_totals = aggregate_by_address(database);
    let display = display_addresses(customer, database);

    let addresses: BTreeSet<&String> = customer_totals.keys().chain(database_totals.keys()).collect();

    let mut groups: BTreeMap<String, SummaryGroup> = BTreeMap::new();
    for address in addresses {
        let shown = display.get(address).unwrap_or(address).clone();
        let mut key = report_key(&shown, home_city);
        if key.is_empty() {
            key = shown.clone();
        }

        let group = groups.entry(key).or_insert_with(|| SummaryGroup {
            display: shown.clone(),
            customer: Decimal::ZERO,
            database: Decimal::ZERO,
        });
        group.customer = accumulate(
            group.customer,
            customer_totals.get(address).copied().unwrap_or_default(),
        );
        group.database = accumulate(
            group.database,
            database_totals.get(address).copied().unwrap_or_default(),
        );
        if shown.chars().count() < group.display.chars().count() {
            group.display = shown;
        }
    }

    let mut rows: Vec<SummaryRow> = groups
        .into_values()
        .map(|group| SummaryRow {
            delta: quantize(group.customer - group.database),
            address: group.display,
            customer: group.customer,
            database: group.database,
        })
        .collect();

    rows.sort_by(|lhs, rhs| {
        rhs.delta
            .abs()
            .cmp(&lhs.delta.abs())
            .then_with(|| lhs.address.cmp(&rhs.address))
    });
    rows
}

/// Detail rows for every discrepancy, sorted by `(address, date)`.
///
/// Rows present on one side only are always critical; a mismatch is critical
/// when its absolute delta reaches `threshold`.
pub fn build_detail_rows(
    diff: &DiffResult,
    customer: &[ParsedRow],
    database: &[ParsedRow],
    threshold: Decimal,
) -> Vec<DetailRow> {
    let customer_raw = first_raw_by_key(customer);
    let database_raw = first_raw_by_key(database);

    let mut rows = Vec::with_capacity(diff.discrepancy_count());

    for (key, hours) in &diff.only_customer {
        rows.push(DetailRow {
            customer_address: customer_raw.get(key).cloned(),
            database_address: None,
            key: key.clone(),
            customer: Some(*hours),
            database: None,
            delta: None,
            status: DetailStatus::OnlyCustomer,
            critical: true,
        });
    }

    for (key, hours) in &diff.only_database {
        rows.push(DetailRow {
            customer_address: None,
            database_address: database_raw.get(key).cloned(),
            key: key.clone(),
            customer: None,
            database: Some(*hours),
            delta: None,
            status: DetailStatus::OnlyDatabase,
            critical: true,
        });
    }

    for mismatch in &diff.differing {
        rows.push(DetailRow {
            customer_address: customer_raw.get(&mismatch.key).cloned(),
            database_address: database_raw.get(&mismatch.key).cloned(),
            key: mismatch.key.clone(),
            customer: Some(mismatch.customer),
            database: Some(mismatch.database),
            delta: Some(mismatch.delta),
            status: DetailStatus::HoursDiffer,
            critical: mismatch.delta.abs() >= threshold,
        });
    }

    rows.sort_by(|lhs, rhs| {
        lhs.key
            .address
            .cmp(&rhs.key.address)
            .then_with(|| lhs.key.date.cmp(&rhs.key.date))
    });
    rows
}

fn first_raw_by_key(rows: &[ParsedRow]) -> BTreeMap<RowKey, String> {
    let mut raw = BTreeMap::new();
    for row in rows {
        raw.entry(row.key.clone())
            .or_insert_with(|| row.address_raw.clone());
    }
    raw
}

/// Lays out the summary and detail rows as the two report sheets.
pub fn build_report(
    diff: &DiffResult,
    customer: &[ParsedRow],
    database: &[ParsedRow],
    config: &ReconConfig,
) -> ReportWorkbook {
    let mut report = SheetTable::new(REPORT_SHEET, REPORT_COLUMNS);
    for row in build_summary_rows(customer, database, &config.home_city) {
        report.rows.push(vec![
            ReportCell::plain(CellValue::Text(row.address)),
            ReportCell::filled(CellValue::hours(Some(row.customer)), HOURS_FILL),
            ReportCell::filled(CellValue::hours(Some(row.database)), HOURS_FILL),
            ReportCell::plain(CellValue::hours(Some(row.delta))),
        ]);
    }

    let mut differences = SheetTable::new(DIFFERENCES_SHEET, DIFFERENCES_COLUMNS);
    for row in build_detail_rows(diff, customer, database, config.critical_threshold) {
        let fill = if row.critical { CRITICAL_FILL } else { MINOR_FILL };
        let values = [
            CellValue::text_or_blank(row.customer_address.as_deref()),
            CellValue::text_or_blank(row.database_address.as_deref()),
            CellValue::Text(row.key.address.clone()),
            CellValue::Date(row.key.date),
            CellValue::hours(row.customer),
            CellValue::hours(row.database),
            CellValue::hours(row.delta),
            CellValue::Text(row.status.label().to_string()),
            CellValue::text_or_blank(row.critical.then_some("ДА")),
        ];
        differences.rows.push(
            values
                .into_iter()
                .map(|value| ReportCell::filled(value, fill))
                .collect(),
        );
    }

    ReportWorkbook {
        tables: vec![report, differences],
    }
}
