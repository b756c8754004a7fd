//! Shared test support: an in-memory marker store.

#![allow(dead_code)]

use dropbignore::MarkerStore;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// In-memory [`MarkerStore`] for exercising classification and reconcile
/// without touching real xattrs. Records every `has_marker` query so tests
/// can assert that pruned subtrees are never consulted.
#[derive(Debug, Default)]
pub struct MemoryMarker {
    marked: Mutex<HashSet<PathBuf>>,
    queried: Mutex<Vec<PathBuf>>,
    failing: Mutex<HashSet<PathBuf>>,
}

impl MemoryMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-mark a directory, as if a previous run had excluded it.
    pub fn mark(&self, path: impl Into<PathBuf>) {
        self.marked.lock().unwrap().insert(path.into());
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.lock().unwrap().contains(path)
    }

    /// Every path `has_marker` has been asked about, in query order.
    pub fn queried(&self) -> Vec<PathBuf> {
        self.queried.lock().unwrap().clone()
    }

    /// Make set/clear fail for `path` with an I/O error.
    pub fn fail_mutations_on(&self, path: impl Into<PathBuf>) {
        self.failing.lock().unwrap().insert(path.into());
    }

    fn check_failing(&self, path: &Path) -> io::Result<()> {
        if self.failing.lock().unwrap().contains(path) {
            Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "marker mutation rejected by test store",
            ))
        } else {
            Ok(())
        }
    }
}

impl MarkerStore for MemoryMarker {
    fn has_marker(&self, path: &Path) -> io::Result<bool> {
        self.queried.lock().unwrap().push(path.to_path_buf());
        Ok(self.marked.lock().unwrap().contains(path))
    }

    fn set_marker(&self, path: &Path) -> io::Result<()> {
        self.check_failing(path)?;
        self.marked.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn clear_marker(&self, path: &Path) -> io::Result<()> {
        self.check_failing(path)?;
        self.marked.lock().unwrap().remove(path);
        Ok(())
    }
}
