// src/reconcile.rs
//! Merging harvested observations into the catalog.
//!
//! All catalog mutation during a run happens here. Per observation:
//! a rejected date or empty url discards it; an unknown url creates an entry;
//! a known url may advance `last_seen` and, independently, replace a
//! placeholder channel name. Merging the same batch twice is a no-op the
//! second time.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::catalog::{clean_name, Catalog, CatalogEntry};
use crate::dates;
use crate::harvest::Observation;

/// When a freshly scraped name may replace the stored channel name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePolicy {
    /// Only while the channel still equals its keyword.
    #[default]
    PlaceholderOnly,
    /// Whenever the same observation advances `last_seen`.
    OnNewerDate,
}

/// What one merge did to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Entries created by this merge.
    pub new_count: usize,
    /// Existing entries whose `last_seen` advanced.
    pub refreshed: usize,
    /// Existing entries whose channel name was replaced.
    pub renamed: usize,
    /// Observations discarded for a bad date or empty url.
    pub rejected: usize,
    pub new_by_keyword: BTreeMap<String, usize>,
}

pub fn merge<'a, I>(catalog: &mut Catalog, observations: I, policy: RenamePolicy) -> MergeReport
where
    I: IntoIterator<Item = &'a Observation>,
{
    let mut report = MergeReport::default();

    for obs in observations {
        let url = obs.url.trim();
        let Some(seen) = dates::normalize(&obs.date_text) else {
            report.rejected += 1;
            continue;
        };
        if url.is_empty() {
            report.rejected += 1;
            continue;
        }
        let name = clean_name(&obs.name_candidate);

        let Some(existing) = catalog.get_mut(url) else {
            let channel = if name.is_empty() {
                obs.keyword.clone()
            } else {
                name
            };
            catalog.insert(
                url.to_string(),
                CatalogEntry {
                    url: url.to_string(),
                    channel,
                    keyword: obs.keyword.clone(),
                    last_seen: seen,
                },
            );
            report.new_count += 1;
            *report.new_by_keyword.entry(obs.keyword.clone()).or_default() += 1;
            continue;
        };

        let advanced = seen > existing.last_seen;
        if advanced {
            existing.last_seen = seen;
            report.refreshed += 1;
        }

        let may_rename = match policy {
            RenamePolicy::PlaceholderOnly => existing.has_placeholder_name(),
            RenamePolicy::OnNewerDate => advanced,
        };
        if may_rename && !name.is_empty() && name != existing.channel {
            tracing::trace!(
                target: "catalog",
                %url,
                from = %existing.channel,
                to = %name,
                "channel renamed"
            );
            existing.channel = name;
            report.renamed += 1;
        }
    }

    report
}
