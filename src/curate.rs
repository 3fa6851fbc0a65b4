// src/curate.rs
//! Curation: turning the catalog into an ordered, capped playlist.
//!
//! Each channel profile finds its entries by a case-insensitive substring of
//! the channel name, drops the ones its exclusion rule rejects, ranks the rest
//! (preferred provider first, then newest), keeps the top `max_count` and
//! labels them with the profile's display name. Profiles are processed by
//! ascending `order`, list position breaking ties; a profile matching nothing
//! contributes nothing.

use std::fmt;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry};

pub type ExcludeFn = Arc<dyn Fn(&CatalogEntry) -> bool + Send + Sync>;

/// How to find, rank, cap and label the entries of one published channel.
#[derive(Clone)]
pub struct ChannelProfile {
    pub search_key: String,
    pub display_name: String,
    pub logo_url: Option<String>,
    pub exclude: Option<ExcludeFn>,
    /// `None` publishes every match.
    pub max_count: Option<usize>,
    pub order: i64,
}

impl fmt::Debug for ChannelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelProfile")
            .field("search_key", &self.search_key)
            .field("display_name", &self.display_name)
            .field("logo_url", &self.logo_url)
            .field("exclude", &self.exclude.as_ref().map(|_| "<fn>"))
            .field("max_count", &self.max_count)
            .field("order", &self.order)
            .finish()
    }
}

impl ChannelProfile {
    pub fn new(search_key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            search_key: search_key.into(),
            display_name: display_name.into(),
            logo_url: None,
            exclude: None,
            max_count: None,
            order: 0,
        }
    }

    pub fn logo(mut self, url: impl Into<String>) -> Self {
        self.logo_url = Some(url.into());
        self
    }

    pub fn max_count(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }

    pub fn order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn exclude_if<F>(mut self, f: F) -> Self
    where
        F: Fn(&CatalogEntry) -> bool + Send + Sync + 'static,
    {
        self.exclude = Some(Arc::new(f));
        self
    }

    /// Exclude entries whose upper-cased channel contains any of `tokens`
    /// (e.g. `["6", "SIX"]` keeps "VIU SIX" out of a "VIU" search).
    pub fn exclude_containing<S: AsRef<str>>(self, tokens: &[S]) -> Self {
        let tokens: Vec<String> = tokens
            .iter()
            .map(|t| t.as_ref().trim().to_uppercase())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return self;
        }
        self.exclude_if(move |e| {
            let name = e.channel.to_uppercase();
            tokens.iter().any(|t| name.contains(t.as_str()))
        })
    }

    fn matches(&self, entry: &CatalogEntry) -> bool {
        entry
            .channel
            .to_lowercase()
            .contains(&self.search_key.to_lowercase())
    }

    fn excludes(&self, entry: &CatalogEntry) -> bool {
        self.exclude.as_ref().is_some_and(|f| f(entry))
    }
}

/// One playlist line pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishItem {
    pub display_name: String,
    pub logo_url: Option<String>,
    pub group_title: String,
    pub url: String,
}

/// Settings shared by every profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurateOptions {
    /// Url substrings marking a known-good provider.
    pub preferred_markers: Vec<String>,
    pub group_title: String,
}

impl Default for CurateOptions {
    fn default() -> Self {
        Self {
            preferred_markers: vec!["jdshipin".to_string()],
            group_title: "Featured".to_string(),
        }
    }
}

impl CurateOptions {
    pub fn is_preferred_provider(&self, url: &str) -> bool {
        self.preferred_markers
            .iter()
            .any(|m| !m.is_empty() && url.contains(m.as_str()))
    }
}

pub fn publish(
    catalog: &Catalog,
    profiles: &[ChannelProfile],
    opts: &CurateOptions,
) -> Vec<PublishItem> {
    let mut ordered: Vec<&ChannelProfile> = profiles.iter().collect();
    ordered.sort_by_key(|p| p.order);

    let mut out = Vec::new();
    for profile in ordered {
        let mut matches: Vec<&CatalogEntry> = catalog
            .values()
            .filter(|e| profile.matches(e) && !profile.excludes(e))
            .collect();
        if matches.is_empty() {
            tracing::debug!(target: "curate", search_key = %profile.search_key, "no matches");
            continue;
        }

        // stable: equal keys stay in url order
        matches.sort_by(|a, b| {
            let ka = (opts.is_preferred_provider(&a.url), a.last_seen);
            let kb = (opts.is_preferred_provider(&b.url), b.last_seen);
            kb.cmp(&ka)
        });
        if let Some(cap) = profile.max_count {
            matches.truncate(cap);
        }

        out.extend(matches.into_iter().map(|e| PublishItem {
            display_name: profile.display_name.clone(),
            logo_url: profile.logo_url.clone(),
            group_title: opts.group_title.clone(),
            url: e.url.clone(),
        }));
    }

    out
}
