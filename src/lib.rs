// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod catalog;
pub mod config;
pub mod curate;
pub mod dates;
pub mod error;
pub mod expiry;
pub mod export;
pub mod guard;
pub mod harvest;
pub mod pipeline;
pub mod reconcile;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::catalog::{Catalog, CatalogEntry};
pub use crate::config::CatalogConfig;
pub use crate::curate::{publish, ChannelProfile, CurateOptions, PublishItem};
pub use crate::error::CatalogError;
pub use crate::guard::{AbortReason, GuardPolicy, GuardVerdict};
pub use crate::harvest::{Observation, ObservationSource};
pub use crate::pipeline::{run_once, RunOutcome, RunReport};
pub use crate::reconcile::{merge, MergeReport, RenamePolicy};
