// src/harvest/mod.rs
pub mod file;

use anyhow::Result;
use serde::Deserialize;

/// One raw record from the harvesting agent. Nothing in it is trusted yet.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Observation {
    pub keyword: String,
    #[serde(default, rename = "name")]
    pub name_candidate: String,
    pub url: String,
    #[serde(default, rename = "date")]
    pub date_text: String,
}

impl Observation {
    pub fn new(
        keyword: impl Into<String>,
        name_candidate: impl Into<String>,
        url: impl Into<String>,
        date_text: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            name_candidate: name_candidate.into(),
            url: url.into(),
            date_text: date_text.into(),
        }
    }
}

#[async_trait::async_trait]
pub trait ObservationSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Observation>>;
    fn name(&self) -> &str;
}

/// Drain every source. A failing source is logged and skipped so the others
/// still contribute to the run.
pub async fn collect(sources: &[Box<dyn ObservationSource>]) -> (Vec<Observation>, usize) {
    let mut raw = Vec::new();
    let mut failed = 0usize;
    for s in sources {
        match s.fetch_latest().await {
            Ok(mut v) => {
                tracing::debug!(
                    target: "harvest",
                    source = s.name(),
                    observations = v.len(),
                    "source drained"
                );
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "harvest", error = ?e, source = s.name(), "source error");
                failed += 1;
            }
        }
    }
    (raw, failed)
}
