// src/expiry.rs
use chrono::{Days, NaiveDate};

use crate::catalog::Catalog;

/// Split the catalog into entries seen within `ttl_days` of `today` and a
/// count of the rest. The cutoff day itself is still valid; undated entries
/// never are.
pub fn partition(catalog: Catalog, today: NaiveDate, ttl_days: u32) -> (Catalog, usize) {
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(ttl_days)))
        .unwrap_or(NaiveDate::MIN);

    let before = catalog.len();
    let valid: Catalog = catalog
        .into_iter()
        .filter(|(_, e)| !e.is_undated() && e.last_seen >= cutoff)
        .collect();
    let expired = before - valid.len();

    tracing::debug!(target: "catalog", %cutoff, kept = valid.len(), expired, "expiry applied");
    (valid, expired)
}
