//! Applying a classification to the marker store.

use crate::classifier::Classification;
use crate::marker::MarkerStore;

use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

/// Options controlling reconcile behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    /// Report what would change without touching any marker.
    pub dry_run: bool,
}

/// What the reconciler was attempting when a marker call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerAction {
    Set,
    Clear,
}

/// A marker mutation that failed. Failures are isolated per path and never
/// roll back or abort the remaining paths; a re-run simply retries them.
#[derive(Debug)]
pub struct MarkerFailure {
    pub path: PathBuf,
    pub action: MarkerAction,
    pub error: io::Error,
}

/// Per-path outcome of one reconcile pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Markers set during this pass (or that would be, under dry run).
    pub excluded: Vec<PathBuf>,
    /// Markers cleared during this pass (or that would be, under dry run).
    pub restored: Vec<PathBuf>,
    /// Already excluded; left untouched.
    pub skipped: Vec<PathBuf>,
    pub failures: Vec<MarkerFailure>,
}

/// Bring marker state into agreement with `classification`.
///
/// Processes each list in classifier order for reproducible logs; the three
/// lists are disjoint, so ordering across them carries no semantics.
pub fn apply(
    classification: &Classification,
    markers: &impl MarkerStore,
    options: ReconcileOptions,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for path in &classification.already_excluded {
        info!(path = %path.display(), "skip, already excluded");
        report.skipped.push(path.clone());
    }

    for path in &classification.to_exclude {
        if options.dry_run {
            info!(path = %path.display(), "would set exclusion marker");
            report.excluded.push(path.clone());
            continue;
        }
        match markers.set_marker(path) {
            Ok(()) => {
                info!(path = %path.display(), "excluded");
                report.excluded.push(path.clone());
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to set exclusion marker");
                report.failures.push(MarkerFailure {
                    path: path.clone(),
                    action: MarkerAction::Set,
                    error,
                });
            }
        }
    }

    for path in &classification.to_restore {
        if options.dry_run {
            info!(path = %path.display(), "would clear exclusion marker");
            report.restored.push(path.clone());
            continue;
        }
        match markers.clear_marker(path) {
            Ok(()) => {
                info!(path = %path.display(), "restored");
                report.restored.push(path.clone());
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "failed to clear exclusion marker");
                report.failures.push(MarkerFailure {
                    path: path.clone(),
                    action: MarkerAction::Clear,
                    error,
                });
            }
        }
    }

    report
}
