//! Safe merging of address variants that differ only by an entrance or
//! section suffix (`ленина 10` vs `ленина 10/1`).
//!
//! A variant is folded into its base only when the base group holds exactly
//! those two spellings and each spelling is confined to a different source.
//! Two spellings living in the same source are treated as distinct stores.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::staffing::recon::model::{Dataset, ParsedRow};
use crate::staffing::recon::normalize::{base_address, has_merge_suffix};

/// Returns `suffixed variant -> base` for every group that is safe to merge.
pub fn build_merge_map(customer: &[ParsedRow], database: &[ParsedRow]) -> BTreeMap<String, String> {
    let customer_addrs: BTreeSet<&str> = customer.iter().map(|row| row.key.address.as_str()).collect();
    let database_addrs: BTreeSet<&str> = database.iter().map(|row| row.key.address.as_str()).collect();

    let mut groups: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
    for addr in customer_addrs.union(&database_addrs) {
        groups.entry(base_address(addr)).or_default().insert(*addr);
    }

    let mut mapping = BTreeMap::new();
    for (base, variants) in &groups {
        if variants.len() != 2 || !variants.contains(base.as_str()) {
            continue;
        }
        let Some(other) = variants.iter().find(|variant| **variant != base.as_str()) else {
            continue;
        };
        if base_address(other) != *base || !has_merge_suffix(other) {
            continue;
        }

        let base_in_customer = customer_addrs.contains(base.as_str());
        let base_in_database = database_addrs.contains(base.as_str());
        let other_in_customer = customer_addrs.contains(other);
        let other_in_database = database_addrs.contains(other);

        let separated = (other_in_customer && base_in_database && !base_in_customer && !other_in_database)
            || (base_in_customer && other_in_database && !other_in_customer && !base_in_database);
        if !separated {
            debug!(%base, variant = %other, "variants share a source, kept apart");
            continue;
        }

        debug!(%base, variant = %other, "address variant merged");
        mapping.insert((*other).to_string(), base.clone());
    }

    mapping
}

/// Rewrites the keys of both datasets according to [`build_merge_map`].
///
/// Dates, raw display addresses and hours are preserved.
pub fn apply_safe_merge(customer: Dataset, database: Dataset) -> (Dataset, Dataset) {
    let mapping = build_merge_map(&customer, &database);
    if mapping.is_empty() {
        return (customer, database);
    }

    let remap = |rows: Dataset| -> Dataset {
        rows.into_iter()
            .map(|row| match mapping.get(&row.key.address) {
                Some(base) => row.rekeyed(base),
                None => row,
            })
            .collect()
    };

    (remap(customer), remap(database))
}
