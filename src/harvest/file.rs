// src/harvest/file.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use super::{Observation, ObservationSource};

/// Reads the JSON array the harvesting agent leaves on disk:
/// `[{"keyword": "VIU", "name": "ViuTV", "url": "http://..", "date": "06-01-2024"}]`.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse(s: &str) -> Result<Vec<Observation>> {
        serde_json::from_str(s).context("parsing observation json")
    }
}

#[async_trait]
impl ObservationSource for JsonFileSource {
    async fn fetch_latest(&self) -> Result<Vec<Observation>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading observations from {}", self.path.display()))?;
        Self::parse(&body)
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
