//! stream-catalog batch entrypoint.
//! One invocation = one harvest cycle: load the catalog, merge the harvester's
//! observations, expire, guard, and publish the playlists.
//!
//! Scheduling (cron/CI) lives outside; a non-zero exit means the run failed.

use anyhow::Context;
use chrono::Local;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stream_catalog::catalog::sink::FsSink;
use stream_catalog::config::CatalogConfig;
use stream_catalog::harvest::{file::JsonFileSource, ObservationSource};
use stream_catalog::pipeline::{run_once, RunOutcome};
use stream_catalog::telemetry::Metrics;

/// Compact logs by default; `CATALOG_LOG_JSON=1` switches to JSON lines for
/// CI log collectors.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("stream_catalog=info,catalog=info,harvest=info,warn"));

    let json = std::env::var("CATALOG_LOG_JSON")
        .ok()
        .is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = CatalogConfig::load_default().context("loading catalog config")?;
    let metrics = match cfg.paths.metrics {
        Some(_) => Some(Metrics::init()?),
        None => None,
    };

    let sources: Vec<Box<dyn ObservationSource>> = cfg
        .paths
        .observations
        .iter()
        .map(|p| Box::new(JsonFileSource::new(p)) as Box<dyn ObservationSource>)
        .collect();
    if sources.is_empty() {
        tracing::warn!("no observation source configured; run will only re-expire the catalog");
    }

    let today = Local::now().date_naive();
    let outcome = run_once(&cfg, &sources, today, &FsSink)
        .await
        .context("catalog run failed")?;

    if let (Some(m), Some(path)) = (&metrics, &cfg.paths.metrics) {
        if let Err(e) = m.write_textfile(path) {
            tracing::warn!("metrics textfile: {e:#}");
        }
    }

    match outcome {
        RunOutcome::Committed(r) => tracing::info!(
            valid = r.valid,
            published = r.published,
            "catalog and playlists updated"
        ),
        RunOutcome::Aborted { reason, report } => tracing::warn!(
            %reason,
            old = report.old_count,
            valid = report.valid,
            "catalog unchanged"
        ),
    }
    Ok(())
}
