use zipgate_archive::ArchiveSource;

use crate::classify::Classifier;
use crate::config::ExtractConfig;
use crate::dirs::Directories;
use crate::error::Result;
use crate::relocate::Relocator;
use crate::report::RelocationReport;

/// Extracts a subset of entries into the staging directory and relocates the valid ones.
pub struct StagingExtractor<'a, A: ArchiveSource + ?Sized, C: Classifier + ?Sized> {
    archive: &'a mut A,
    relocator: Relocator<'a, C>,
    staging: &'a std::path::Path,
}

impl<'a, A, C> StagingExtractor<'a, A, C>
where
    A: ArchiveSource + ?Sized,
    C: Classifier + ?Sized,
{
    /// Both directories are checked here, before the archive is touched.
    pub fn new(
        archive: &'a mut A,
        dirs: &'a Directories,
        classifier: &'a C,
        config: &'a ExtractConfig,
    ) -> Result<Self> {
        let staging = dirs.require_staging()?;
        let relocator = Relocator::new(dirs, classifier, config)?;

        Ok(Self {
            archive,
            relocator,
            staging,
        })
    }

    pub fn extract(&mut self, entries: &[String]) -> Result<RelocationReport> {
        if entries.is_empty() {
            tracing::debug!("nothing selected, skipping extraction");
            return Ok(RelocationReport::default());
        }

        let staged = self.archive.extract_entries(entries, self.staging)?;
        tracing::info!(
            requested = entries.len(),
            staged = staged.len(),
            staging = %self.staging.display(),
            "staged entries"
        );

        self.relocator.relocate(entries)
    }
}
