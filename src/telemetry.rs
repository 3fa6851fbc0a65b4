// src/telemetry.rs
use anyhow::{Context, Result};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::path::Path;

use crate::catalog::sink::{Artifact, ArtifactSink, FsSink};
use crate::pipeline::RunOutcome;

/// One-time metrics registration (so series show up in the textfile).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("catalog_observations_total", "Observations received from sources.");
        describe_counter!(
            "catalog_observations_rejected_total",
            "Observations dropped for an unparseable date or empty url."
        );
        describe_counter!("catalog_source_errors_total", "Observation source failures.");
        describe_counter!("catalog_new_entries_total", "Catalog entries created.");
        describe_counter!("catalog_expired_total", "Entries dropped by the TTL.");
        describe_counter!(
            "catalog_guard_aborts_total",
            "Runs refused by the circuit breaker."
        );
        describe_gauge!("catalog_valid_entries", "Valid entries after the last run.");
        describe_gauge!("catalog_published_items", "Playlist items published by the last commit.");
        describe_gauge!("catalog_last_run_ts", "Unix ts when the pipeline last ran.");
    });
}

pub(crate) fn record_source_errors(n: usize) {
    counter!("catalog_source_errors_total").increment(n as u64);
}

pub(crate) fn record_run(outcome: &RunOutcome) {
    let r = outcome.report();
    counter!("catalog_observations_total").increment(r.observations as u64);
    counter!("catalog_observations_rejected_total").increment(r.merge.rejected as u64);
    counter!("catalog_new_entries_total").increment(r.merge.new_count as u64);
    counter!("catalog_expired_total").increment(r.expired as u64);
    gauge!("catalog_valid_entries").set(r.valid as f64);
    match outcome {
        RunOutcome::Committed(r) => gauge!("catalog_published_items").set(r.published as f64),
        RunOutcome::Aborted { .. } => counter!("catalog_guard_aborts_total").increment(1),
    }
    gauge!("catalog_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
}

/// Prometheus recorder whose snapshot is written as a node-exporter textfile.
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    pub fn init() -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        ensure_metrics_described();
        Ok(Self { handle })
    }

    /// Replace `path` with the current exposition text.
    pub fn write_textfile(&self, path: &Path) -> Result<()> {
        FsSink
            .store(vec![Artifact::new(path, self.handle.render())])
            .with_context(|| format!("writing metrics textfile {}", path.display()))
    }
}
