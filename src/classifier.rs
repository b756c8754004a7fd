//! Directory tree classification against the pattern set and marker state.

use crate::marker::MarkerStore;
use crate::patterns::PatternSet;

use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Outcome of one classification pass: three disjoint path lists.
///
/// A directory appears in exactly one list, and never under an ancestor that
/// was pruned (`already_excluded` or `to_exclude`) in the same pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Marked and still matching a pattern; nothing to do.
    pub already_excluded: Vec<PathBuf>,
    /// Matching a pattern but not yet marked; the marker should be set.
    pub to_exclude: Vec<PathBuf>,
    /// Marked but no longer matching any pattern; the marker should be cleared.
    pub to_restore: Vec<PathBuf>,
}

impl Classification {
    /// True when the tree is already in the desired state.
    pub fn is_settled(&self) -> bool {
        self.to_exclude.is_empty() && self.to_restore.is_empty()
    }
}

/// True when `path` is a strict descendant of any path in `ancestors`.
///
/// Component-wise containment via `Path::starts_with`, so `root/ignored` is
/// not covered by `root/ignore`.
fn covered_by(path: &Path, ancestors: &[PathBuf]) -> bool {
    ancestors
        .iter()
        .any(|ancestor| path != ancestor && path.starts_with(ancestor))
}

/// Walk every directory under `root` (root included) and classify each one
/// by marker state and pattern membership.
///
/// The walk is sequential and depth-first. Hidden directories are visited:
/// exclusion patterns commonly target dotted directories, so the walker's
/// default hidden-entry suppression is turned off for this walk only.
/// Subtrees rooted at a directory classified into `already_excluded` or
/// `to_exclude` are pruned; the marker applies recursively, so their
/// descendants are never visited or queried.
///
/// Per-path failures (walk errors, marker queries) are logged and skipped;
/// classification is best effort and partial results are still useful.
pub fn classify(
    root: &Path,
    patterns: &PatternSet,
    markers: &impl MarkerStore,
) -> Classification {
    let mut result = Classification::default();

    // Directories whose subtrees must not be descended into. Shared with the
    // walker's entry filter, which runs on each child before it is yielded.
    let pruned = Arc::new(Mutex::new(HashSet::<PathBuf>::new()));
    let pruned_filter = Arc::clone(&pruned);

    let walker = WalkBuilder::new(root)
        .hidden(false)
        // Gitignore processing is irrelevant here: the .dropbignore pattern
        // set is the sole authority on what gets excluded.
        .git_ignore(false)
        .ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let path = entry.path();
            !pruned_filter
                .lock()
                .unwrap()
                .iter()
                .any(|p| path != p && path.starts_with(p))
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };

        // Files are never classified; only directories carry the marker.
        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }

        let path = entry.path();

        // The entry filter already blocks descent into pruned subtrees; this
        // re-check guards entries that were queued before a prune landed.
        if pruned
            .lock()
            .unwrap()
            .iter()
            .any(|p| path != p && path.starts_with(p))
        {
            continue;
        }

        let marked = match markers.has_marker(path) {
            Ok(marked) => marked,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "marker query failed; skipping path");
                continue;
            }
        };
        let matched = patterns.matches(path);

        match (marked, matched) {
            (true, true) => {
                info!(path = %path.display(), "already excluded");
                result.already_excluded.push(path.to_path_buf());
                pruned.lock().unwrap().insert(path.to_path_buf());
            }
            (true, false) => {
                // Restoration does not exempt the subtree from evaluation;
                // keep descending.
                info!(path = %path.display(), "marked but no longer matches; will restore");
                result.to_restore.push(path.to_path_buf());
            }
            (false, true) => {
                if covered_by(path, &result.to_exclude)
                    || covered_by(path, &result.already_excluded)
                {
                    debug!(path = %path.display(), "covered by an excluded ancestor");
                } else {
                    info!(path = %path.display(), "matches; will exclude");
                    result.to_exclude.push(path.to_path_buf());
                }
                pruned.lock().unwrap().insert(path.to_path_buf());
            }
            (false, false) => {}
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_component_wise() {
        let ancestors = vec![PathBuf::from("/root/ignore")];
        assert!(covered_by(Path::new("/root/ignore/sub"), &ancestors));
        assert!(!covered_by(Path::new("/root/ignored"), &ancestors));
        // A path never covers itself.
        assert!(!covered_by(Path::new("/root/ignore"), &ancestors));
    }
}
