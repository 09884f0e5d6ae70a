use std::path::Path;

use crate::Result;
use crate::entry::ArchiveEntry;

mod zip;

pub use self::zip::ZipSource;

/// The archive operations the extraction pipeline depends on.
///
/// Implementations must list and extract entries in the archive's native order.
/// After [`close`](ArchiveSource::close) every other operation fails with
/// [`Error::Closed`](crate::Error::Closed); closing again is a no-op.
pub trait ArchiveSource {
    /// Location of the archive on disk, if it came from a file.
    fn path(&self) -> Option<&Path>;

    fn entries(&mut self) -> Result<Vec<ArchiveEntry>>;

    /// Extract the entries whose names appear in `names` under `target`, keeping their
    /// relative paths. Names with no matching entry are ignored, and so are names that
    /// would resolve outside `target`.
    ///
    /// Returns the names that were written, in archive order.
    fn extract_entries(&mut self, names: &[String], target: &Path) -> Result<Vec<String>>;

    /// Extract every entry under `target`.
    ///
    /// A single name that would resolve outside `target` fails the call before
    /// anything is written.
    fn extract_all(&mut self, target: &Path) -> Result<Vec<String>>;

    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;
}
