//! Zip archive capability with path sanitization.
//!
//! # Architecture
//!
//! - `source/` - The [`ArchiveSource`] capability consumed by the pipeline, and
//!   [`ZipSource`], its `zip`-crate implementation
//! - `sanitize.rs` - Entry path sanitization (zip-slip prevention)
//! - `entry.rs` - Listed entry metadata

pub use entry::{ArchiveEntry, EntryKind};
pub use error::{Error, Result};
pub use sanitize::{SanitizedPath, sanitize_entry_path};
pub use source::{ArchiveSource, ZipSource};

mod entry;
mod error;
mod sanitize;
mod source;
