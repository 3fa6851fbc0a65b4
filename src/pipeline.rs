// src/pipeline.rs
//! One batch run: load, harvest, merge, expire, guard, curate, export, save.
//!
//! The guard sits between the in-memory result and every write. An aborted
//! run touches no file; it is reported through the returned outcome, a
//! `warn!` and the `catalog_guard_aborts_total` counter.

use chrono::NaiveDate;

use crate::catalog::sink::{Artifact, ArtifactSink};
use crate::catalog::{store, Catalog};
use crate::config::CatalogConfig;
use crate::curate;
use crate::error::{CatalogError, Result};
use crate::export::{render_m3u, render_txt};
use crate::expiry;
use crate::guard::{AbortReason, GuardVerdict};
use crate::harvest::{self, Observation, ObservationSource};
use crate::reconcile::{self, MergeReport};
use crate::telemetry;

/// Counts gathered along one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Entries on disk before the run.
    pub old_count: usize,
    pub observations: usize,
    pub merge: MergeReport,
    /// Entries that survived expiry.
    pub valid: usize,
    pub expired: usize,
    /// Playlist items written (zero when aborted).
    pub published: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Committed(RunReport),
    Aborted { reason: AbortReason, report: RunReport },
}

impl RunOutcome {
    pub fn report(&self) -> &RunReport {
        match self {
            RunOutcome::Committed(r) => r,
            RunOutcome::Aborted { report, .. } => report,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self, RunOutcome::Committed(_))
    }
}

/// Merge `observations` into the already loaded `catalog` and, if the guard
/// allows it, write catalog, playlist and text list through `sink`.
pub fn process<S: ArtifactSink + ?Sized>(
    cfg: &CatalogConfig,
    mut catalog: Catalog,
    observations: &[Observation],
    today: NaiveDate,
    sink: &S,
) -> Result<RunOutcome> {
    let mut report = RunReport {
        old_count: catalog.len(),
        observations: observations.len(),
        ..RunReport::default()
    };

    report.merge = reconcile::merge(&mut catalog, observations, cfg.rename_policy);
    for (kw, n) in &report.merge.new_by_keyword {
        tracing::info!(target: "catalog", keyword = %kw, new = n, "new entries");
    }

    let (valid, expired) = expiry::partition(catalog, today, cfg.ttl_days);
    report.valid = valid.len();
    report.expired = expired;

    if let GuardVerdict::Abort(reason) = cfg.guard.decide(report.old_count, report.valid) {
        tracing::warn!(
            target: "catalog",
            %reason,
            old = report.old_count,
            valid = report.valid,
            "run aborted by circuit breaker, previous artifacts left in place"
        );
        return Ok(RunOutcome::Aborted { reason, report });
    }

    let items = curate::publish(&valid, &cfg.channel_profiles(), &cfg.curate_options());
    report.published = items.len();

    let table = store::render(&valid).map_err(|e| CatalogError::io(&cfg.paths.catalog, e))?;
    sink.store(vec![
        Artifact::new(&cfg.paths.catalog, table),
        Artifact::new(
            &cfg.paths.playlist,
            render_m3u(&items, cfg.publish.epg_url.as_deref()),
        ),
        Artifact::new(&cfg.paths.text, render_txt(&items)),
    ])?;

    tracing::info!(
        target: "catalog",
        new = report.merge.new_count,
        refreshed = report.merge.refreshed,
        expired = report.expired,
        valid = report.valid,
        published = report.published,
        "run committed"
    );
    Ok(RunOutcome::Committed(report))
}

/// Full run. The catalog is loaded before any source is drained, so an
/// unreadable catalog fails the run without harvesting.
pub async fn run_once<S: ArtifactSink + ?Sized>(
    cfg: &CatalogConfig,
    sources: &[Box<dyn ObservationSource>],
    today: NaiveDate,
    sink: &S,
) -> Result<RunOutcome> {
    telemetry::ensure_metrics_described();

    let catalog = store::load(&cfg.paths.catalog)?;

    let (observations, failed) = harvest::collect(sources).await;
    if failed > 0 {
        telemetry::record_source_errors(failed);
    }

    let outcome = process(cfg, catalog, &observations, today, sink)?;
    telemetry::record_run(&outcome);
    Ok(outcome)
}
