//! Sync-exclusion marker storage on directory extended attributes.

use std::io;
use std::path::Path;

/// Extended attribute recognized by the Dropbox client as "do not sync".
///
/// Linux exposes user-space xattrs under the `user.` namespace, and that is
/// where the Dropbox Linux client reads the flag; macOS and the BSDs use the
/// bare key.
#[cfg(target_os = "linux")]
pub const MARKER_XATTR: &str = "user.com.dropbox.ignored";
#[cfg(not(target_os = "linux"))]
pub const MARKER_XATTR: &str = "com.dropbox.ignored";

/// Value stored under [`MARKER_XATTR`].
pub const MARKER_VALUE: &[u8] = b"1";

/// Capability for reading and mutating the exclusion marker on a directory.
///
/// The classifier only reads through this interface; mutation happens in the
/// reconcile phase, strictly after classification completes. `has_marker`
/// reports I/O failure separately from absence so a vanished or unreadable
/// path can be skipped without being mistaken for an unmarked one.
pub trait MarkerStore {
    fn has_marker(&self, path: &Path) -> io::Result<bool>;
    fn set_marker(&self, path: &Path) -> io::Result<()>;
    fn clear_marker(&self, path: &Path) -> io::Result<()>;
}

/// Production marker store backed by the host filesystem's xattrs.
#[derive(Debug, Clone, Copy, Default)]
pub struct XattrMarker;

impl MarkerStore for XattrMarker {
    fn has_marker(&self, path: &Path) -> io::Result<bool> {
        Ok(xattr::get(path, MARKER_XATTR)?.is_some())
    }

    fn set_marker(&self, path: &Path) -> io::Result<()> {
        xattr::set(path, MARKER_XATTR, MARKER_VALUE)
    }

    fn clear_marker(&self, path: &Path) -> io::Result<()> {
        xattr::remove(path, MARKER_XATTR)
    }
}
