// src/guard.rs
//! Circuit breaker between a run's result and the persisted catalog.
//!
//! A harvest that got blocked or scraped an error page still "succeeds" with
//! a handful of rows. Committing that would wipe the catalog, so the new
//! valid-set size is compared against what was on disk before the run.
//! Pure logic, no I/O.

use serde::Deserialize;
use std::fmt;

pub const DEFAULT_MIN_ABSOLUTE: usize = 5;
pub const DEFAULT_MIN_RATIO: f64 = 0.5;

fn default_min_absolute() -> usize {
    DEFAULT_MIN_ABSOLUTE
}
fn default_min_ratio() -> f64 {
    DEFAULT_MIN_RATIO
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GuardPolicy {
    /// Below this many valid entries a run against a populated catalog aborts.
    #[serde(default = "default_min_absolute")]
    pub min_absolute: usize,
    /// Fraction of the previous catalog a run must keep.
    #[serde(default = "default_min_ratio")]
    pub min_ratio: f64,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            min_absolute: DEFAULT_MIN_ABSOLUTE,
            min_ratio: DEFAULT_MIN_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Nothing valid left.
    Empty,
    /// Fewer than `min_absolute` entries against a populated catalog.
    BelowMinimum,
    /// Fewer than `floor(old * min_ratio)` entries.
    Collapsed,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AbortReason::Empty => "no valid entries",
            AbortReason::BelowMinimum => "below absolute minimum",
            AbortReason::Collapsed => "catalog collapsed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    Commit,
    Abort(AbortReason),
}

impl GuardPolicy {
    /// `old_count`: entries on disk before the run. `new_count`: valid entries now.
    pub fn decide(&self, old_count: usize, new_count: usize) -> GuardVerdict {
        if new_count == 0 {
            return GuardVerdict::Abort(AbortReason::Empty);
        }
        if old_count > 0 {
            if new_count < self.min_absolute {
                return GuardVerdict::Abort(AbortReason::BelowMinimum);
            }
            let floor = (old_count as f64 * self.min_ratio).floor() as usize;
            if new_count < floor {
                return GuardVerdict::Abort(AbortReason::Collapsed);
            }
        }
        GuardVerdict::Commit
    }
}

/// [`GuardPolicy::decide`] with the default thresholds.
pub fn decide(old_count: usize, new_count: usize) -> GuardVerdict {
    GuardPolicy::default().decide(old_count, new_count)
}
