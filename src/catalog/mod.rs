// src/catalog/mod.rs
pub mod sink;
pub mod store;

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;

use crate::dates::EPOCH_SENTINEL;

/// One reconciled stream, keyed by its url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub url: String,
    pub channel: String,
    pub keyword: String,
    pub last_seen: NaiveDate,
}

impl CatalogEntry {
    /// True while the channel still carries the search keyword it was found
    /// under instead of a scraped name.
    pub fn has_placeholder_name(&self) -> bool {
        self.channel == self.keyword
    }

    /// Loaded with no usable date; always expired.
    pub fn is_undated(&self) -> bool {
        self.last_seen == EPOCH_SENTINEL
    }
}

/// The keyed catalog. Ordered by url so every downstream pass is deterministic.
pub type Catalog = BTreeMap<String, CatalogEntry>;

/// Clean a scraped channel name: decode HTML entities, collapse whitespace, trim.
pub fn clean_name(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("whitespace regex"));
    re_ws.replace_all(&decoded, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_collapses_ws_and_entities() {
        assert_eq!(clean_name("  TVB&nbsp;&nbsp;PLUS \n HD "), "TVB PLUS HD");
        assert_eq!(clean_name("\t"), "");
    }

    #[test]
    fn placeholder_detection() {
        let e = CatalogEntry {
            url: "http://a/1".into(),
            channel: "VIU".into(),
            keyword: "VIU".into(),
            last_seen: EPOCH_SENTINEL,
        };
        assert!(e.has_placeholder_name());
        assert!(e.is_undated());
    }
}
