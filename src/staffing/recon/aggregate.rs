use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::{Decimal, RoundingStrategy};

use crate::staffing::recon::model::{DiffResult, HoursMismatch, ParsedRow, RowKey};

/// Rounds to two decimals, half to even, and fixes the scale at two digits.
pub fn quantize(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}

/// Adds `hours` to a running total and re-quantizes the result.
///
/// Rounding happens on every partial sum, not once at the end, so totals can
/// drift from a one-shot rounded sum when inputs carry more than two decimals.
/// Both sides of a reconciliation are summed this way.
pub fn accumulate(total: Decimal, hours: Decimal) -> Decimal {
    quantize(total + hours)
}

/// Sums hours per `(date, address)` key.
pub fn aggregate(rows: &[ParsedRow]) -> BTreeMap<RowKey, Decimal> {
    let mut totals: BTreeMap<RowKey, Decimal> = BTreeMap::new();
    for row in rows {
        let entry = totals.entry(row.key.clone()).or_insert(Decimal::ZERO);
        *entry = accumulate(*entry, row.hours);
    }
    totals
}

/// Sums hours per normalized address across all dates.
pub fn aggregate_by_address(rows: &[ParsedRow]) -> BTreeMap<String, Decimal> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for row in rows {
        let entry = totals
            .entry(row.key.address.clone())
            .or_insert(Decimal::ZERO);
        *entry = accumulate(*entry, row.hours);
    }
    totals
}

/// Classifies every key of both maps.
///
/// Totals are compared exactly; any difference lands in `differing` with
/// `delta = customer - database`. All collections come out sorted by
/// `(date, address)`.
pub fn diff(
    customer: &BTreeMap<RowKey, Decimal>,
    database: &BTreeMap<RowKey, Decimal>,
) -> DiffResult {
    let keys: BTreeSet<&RowKey> = customer.keys().chain(database.keys()).collect();
    let mut result = DiffResult::default();

    for key in keys {
        match (customer.get(key), database.get(key)) {
            (Some(hours), None) => result.only_customer.push((key.clone(), *hours)),
            (None, Some(hours)) => result.only_database.push((key.clone(), *hours)),
            (Some(left), Some(right)) if left == right => {
                result.matched.push((key.clone(), *left));
            }
            (Some(left), Some(right)) => result.differing.push(HoursMismatch {
                key: key.clone(),
                customer: *left,
                database: *right,
                delta: quantize(*left - *right),
            }),
            (None, None) => {}
        }
    }

    result
}
