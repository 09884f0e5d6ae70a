//! Extract zip members through a staging directory, keep only those whose content
//! matches an allow-list, and relocate them into a destination tree.
//!
//! # Architecture
//!
//! - `session.rs` - [`Session`] lifecycle, the three selection strategies, teardown
//! - `select.rs` - Which entries a strategy picks
//! - `stage.rs` - Extraction of a selection into the staging directory
//! - `relocate.rs` - Classification and copy into the destination
//! - `policy.rs` - Destination path and naming rules
//! - `classify.rs` - The [`Classifier`] capability and [`MimeClassifier`]
//! - `dirs.rs` - Base, destination and staging directories
//! - `config.rs` - [`ExtractConfig`] and [`Cleanup`]
//! - `report.rs` - Per-pass outcome

pub use classify::{AllowList, Classification, Classifier, MimeClassifier};
pub use config::{Cleanup, DEFAULT_SEPARATOR, DigestStrategy, ExtractConfig};
pub use dirs::Directories;
pub use error::{Error, Result};
pub use policy::PathPolicy;
pub use relocate::Relocator;
pub use report::{Accepted, Failed, Rejected, RelocationReport};
pub use session::{Session, SessionBuilder, ZipSession};
pub use stage::StagingExtractor;

pub use zipgate_archive::{ArchiveEntry, ArchiveSource, ZipSource};

pub mod classify;
pub mod select;
mod config;
mod dirs;
mod error;
mod policy;
mod relocate;
mod report;
mod session;
mod stage;
