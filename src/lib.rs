//! dropbignore - Dropbox sync-exclusion reconciler
//!
//! dropbignore brings the `com.dropbox.ignored` extended attribute on every
//! directory under a Dropbox root into agreement with the glob patterns in a
//! `.dropbignore` file. Each directory ends up in one of three states:
//! already excluded and still matching (left alone), matching but not yet
//! excluded (marker set), or excluded but no longer matching (marker
//! cleared).
//!
//! ## Architecture
//!
//! - [`patterns`] loads and matches the ignore patterns (user file plus a
//!   built-in always-excluded set).
//! - [`marker`] is the capability interface over the exclusion xattr.
//! - [`classifier`] walks the tree once and produces three disjoint path
//!   lists, pruning excluded subtrees.
//! - [`reconcile`] applies the classification to the marker store.

pub mod classifier;
pub mod marker;
pub mod patterns;
pub mod reconcile;

// Re-export commonly used items
pub use classifier::{classify, Classification};
pub use marker::{MarkerStore, XattrMarker, MARKER_VALUE, MARKER_XATTR};
pub use patterns::{ConfigError, PatternSet, BUILTIN_PATTERNS, IGNORE_FILE_NAME};
pub use reconcile::{apply, MarkerAction, MarkerFailure, ReconcileOptions, ReconcileReport};
