use std::path::Path;

use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::staffing::recon::aggregate::{aggregate, diff};
use crate::staffing::recon::config::ReconConfig;
use crate::staffing::recon::error::{ReconError, Result};
use crate::staffing::recon::io::{excel_read, excel_write};
use crate::staffing::recon::merge::apply_safe_merge;
use crate::staffing::recon::model::{Dataset, DiffResult, Sheet, Side};
use crate::staffing::recon::parse::parse_sheet;
use crate::staffing::recon::report::{ReportWorkbook, build_report, render_text_summary};

/// Everything computed by one reconciliation run.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    /// Customer rows after the address-variant merge.
    pub customer_rows: Dataset,
    /// Database rows after the address-variant merge.
    pub database_rows: Dataset,
    pub diff: DiffResult,
    pub summary_text: String,
    pub workbook: ReportWorkbook,
}

impl Reconciliation {
    /// Total customer hours across all keys.
    pub fn customer_total(&self) -> Decimal {
        self.customer_rows.iter().map(|row| row.hours).sum()
    }

    /// Total database hours across all keys.
    pub fn database_total(&self) -> Decimal {
        self.database_rows.iter().map(|row| row.hours).sum()
    }
}

/// Reconciles two already-loaded sheets.
///
/// Both sheets are parsed (layout auto-detected), address variants are merged
/// once, hours are aggregated per `(date, address)` and compared. Nothing is
/// produced unless both inputs parse.
#[instrument(level = "info", skip_all)]
pub fn reconcile(customer: &Sheet, database: &Sheet, config: &ReconConfig) -> Result<Reconciliation> {
    let customer_rows = parse_side(customer, Side::Customer, config)?;
    let database_rows = parse_side(database, Side::Database, config)?;

    let (customer_rows, database_rows) = apply_safe_merge(customer_rows, database_rows);

    let customer_totals = aggregate(&customer_rows);
    let database_totals = aggregate(&database_rows);
    debug!(
        customer_keys = customer_totals.len(),
        database_keys = database_totals.len(),
        "hours aggregated"
    );

    let diff = diff(&customer_totals, &database_totals);
    info!(
        only_customer = diff.only_customer.len(),
        only_database = diff.only_database.len(),
        differing = diff.differing.len(),
        matched = diff.matched.len(),
        "datasets compared"
    );

    let summary_text = render_text_summary(&customer_rows, &database_rows, &diff, config.text_preview_limit);
    let workbook = build_report(&diff, &customer_rows, &database_rows, config);

    Ok(Reconciliation {
        customer_rows,
        database_rows,
        diff,
        summary_text,
        workbook,
    })
}

fn parse_side(sheet: &Sheet, side: Side, config: &ReconConfig) -> Result<Dataset> {
    let rows = parse_sheet(sheet, config)?;
    if rows.is_empty() {
        return Err(ReconError::EmptyDataset(side.label()));
    }
    info!(side = side.label(), row_count = rows.len(), "dataset loaded");
    Ok(rows)
}

/// Reconciles two in-memory `.xlsx` documents and returns the textual summary
/// together with the report bytes.
#[instrument(level = "info", skip_all, fields(customer_len = customer.len(), database_len = database.len()))]
pub fn reconcile_bytes(customer: &[u8], database: &[u8], config: &ReconConfig) -> Result<(String, Vec<u8>)> {
    let customer = excel_read::read_first_sheet_from_bytes(customer)?;
    let database = excel_read::read_first_sheet_from_bytes(database)?;
    let outcome = reconcile(&customer, &database, config)?;
    let bytes = excel_write::report_to_bytes(&outcome.workbook)?;
    Ok((outcome.summary_text, bytes))
}

/// Reconciles two `.xlsx` files without writing a report.
#[instrument(
    level = "info",
    skip_all,
    fields(customer = %customer.display(), database = %database.display())
)]
pub fn compare_files(customer: &Path, database: &Path, config: &ReconConfig) -> Result<Reconciliation> {
    let customer = excel_read::read_first_sheet(customer)?;
    let database = excel_read::read_first_sheet(database)?;
    reconcile(&customer, &database, config)
}

/// Reconciles two `.xlsx` files and writes the report to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(customer = %customer.display(), database = %database.display(), output = %output.display())
)]
pub fn reconcile_files(
    customer: &Path,
    database: &Path,
    output: &Path,
    config: &ReconConfig,
) -> Result<Reconciliation> {
    let outcome = compare_files(customer, database, config)?;
    excel_write::write_report(output, &outcome.workbook)?;
    info!(sheet_count = outcome.workbook.tables.len(), "report written");
    Ok(outcome)
}
