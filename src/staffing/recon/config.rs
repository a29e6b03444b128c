use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::staffing::recon::error::Result;
use crate::staffing::recon::normalize::fold_text;

/// City that the business treats as implicit when an address names another one.
pub const DEFAULT_HOME_CITY: &str = "тюмень";

/// Tunables for a reconciliation run.
///
/// Every field has a default, so a JSON file only needs to name the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Lowercased name of the home city dropped in front of another city.
    pub home_city: String,
    /// Year used to resolve `D.M` headers in matrix sheets.
    pub default_year: i32,
    /// Absolute hour delta from which a mismatch is flagged as critical.
    #[serde(with = "rust_decimal::serde::str")]
    pub critical_threshold: Decimal,
    /// Number of date headers that switches a sheet into matrix mode.
    pub min_matrix_date_columns: usize,
    /// How many leading rows are scanned for the row-wise header.
    pub header_scan_rows: usize,
    /// Window (in rows after the header) used to sniff a date column by content.
    pub date_sniff_rows: usize,
    /// Minimum number of parsable dates for a sniffed date column.
    pub min_date_hits: usize,
    /// Entries listed per category in the textual summary.
    pub text_preview_limit: usize,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            home_city: DEFAULT_HOME_CITY.to_string(),
            default_year: Local::now().year(),
            critical_threshold: Decimal::ONE,
            min_matrix_date_columns: 10,
            header_scan_rows: 250,
            date_sniff_rows: 120,
            min_date_hits: 3,
            text_preview_limit: 50,
        }
    }
}

impl ReconConfig {
    /// Loads a configuration from a JSON file, filling gaps with defaults.
    ///
    /// The home city is folded the same way addresses are, so `"Тюмень"` in
    /// the file still matches the lowercased first segment.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&data)?;
        config.home_city = fold_text(&config.home_city);
        Ok(config)
    }

    /// Returns a copy pinned to the given year, handy for reproducible runs.
    pub fn with_year(mut self, year: i32) -> Self {
        self.default_year = year;
        self
    }

    /// Returns a copy using another home city. The name is lowercased.
    pub fn with_home_city(mut self, city: &str) -> Self {
        self.home_city = fold_text(city);
        self
    }

    /// Parses a threshold given as text, accepting a comma decimal separator.
    pub fn with_threshold_str(mut self, value: &str) -> Option<Self> {
        let threshold = Decimal::from_str(&value.trim().replace(',', ".")).ok()?;
        self.critical_threshold = threshold;
        Some(self)
    }
}
