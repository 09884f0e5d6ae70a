use std::path::{Path, PathBuf};

use zipgate_archive::sanitize_entry_path;

use crate::classify::Classifier;
use crate::config::ExtractConfig;
use crate::dirs::Directories;
use crate::error::Result;
use crate::policy::PathPolicy;
use crate::report::{Accepted, Failed, Rejected, RelocationReport};

/// Moves validated files from the staging directory into the destination.
pub struct Relocator<'a, C: Classifier + ?Sized> {
    staging: &'a Path,
    policy: PathPolicy<'a>,
    classifier: &'a C,
    config: &'a ExtractConfig,
}

impl<'a, C: Classifier + ?Sized> Relocator<'a, C> {
    /// Fails with a configuration error unless both directories are set.
    pub fn new(
        dirs: &'a Directories,
        classifier: &'a C,
        config: &'a ExtractConfig,
    ) -> Result<Self> {
        let destination = dirs.require_destination()?;
        let staging = dirs.require_staging()?;

        Ok(Self {
            staging,
            policy: PathPolicy::new(destination, config),
            classifier,
            config,
        })
    }

    /// Classify each staged entry and copy the valid ones.
    ///
    /// Missing, rejected and uncopyable files are recorded in the report and do not stop
    /// the batch. Only a destination directory that cannot be created is fatal.
    pub fn relocate(&self, entries: &[String]) -> Result<RelocationReport> {
        let mut report = RelocationReport::default();

        for entry in entries {
            let Some(staged) = self.locate(entry) else {
                tracing::warn!(entry = %entry, "staged file not found, skipping");
                report.missing.push(entry.clone());
                continue;
            };

            let class = match self.classifier.classify(&staged) {
                Ok(class) => class,
                Err(e) => {
                    tracing::warn!(entry = %entry, error = %e, "classification failed, skipping");
                    report.failed.push(failed(entry, e));
                    continue;
                }
            };

            if !class.is_valid {
                tracing::warn!(entry = %entry, mime = %class.mime_type, "content rejected");
                report.rejected.push(Rejected {
                    entry: entry.clone(),
                    mime_type: class.mime_type,
                });
                continue;
            }

            let digest = match self.config.digest.compute(&staged) {
                Ok(digest) => digest,
                Err(e) => {
                    tracing::warn!(entry = %entry, error = %e, "digest failed, skipping");
                    report.failed.push(failed(entry, e));
                    continue;
                }
            };

            let destination = self.policy.compute_destination(entry)?;
            match copy_and_resolve(&staged, &destination) {
                Ok(path) => {
                    tracing::debug!(entry = %entry, to = %path.display(), "relocated");
                    report.accepted.push(Accepted {
                        entry: entry.clone(),
                        path,
                        mime_type: class.mime_type,
                        digest,
                    });
                }
                Err(e) => {
                    tracing::warn!(entry = %entry, error = %e, "copy failed, skipping");
                    report.failed.push(failed(entry, e));
                }
            }
        }

        tracing::info!(
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            missing = report.missing.len(),
            failed = report.failed.len(),
            "relocation finished"
        );
        Ok(report)
    }

    /// The canonical staged file for `entry`, if it exists inside the staging directory.
    fn locate(&self, entry: &str) -> Option<PathBuf> {
        let sanitized = sanitize_entry_path(entry, self.staging).ok()?;
        let resolved = zipgate_fs::resolve(&sanitized.resolved).ok()?;
        (resolved.starts_with(self.staging) && resolved.is_file()).then_some(resolved)
    }
}

fn copy_and_resolve(from: &Path, to: &Path) -> zipgate_fs::Result<PathBuf> {
    zipgate_fs::copy_file(from, to)?;
    zipgate_fs::resolve(to)
}

fn failed(entry: &str, reason: impl ToString) -> Failed {
    Failed {
        entry: entry.to_string(),
        reason: reason.to_string(),
    }
}
