use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use zipgate_archive::{ArchiveEntry, ArchiveSource, ZipSource};

use crate::classify::{Classifier, MimeClassifier};
use crate::config::{Cleanup, ExtractConfig};
use crate::dirs::Directories;
use crate::error::{Error, Result};
use crate::relocate::Relocator;
use crate::report::RelocationReport;
use crate::select;
use crate::stage::StagingExtractor;

/// A session over a zip file on disk.
pub type ZipSession<C = MimeClassifier> = Session<ZipSource<BufReader<File>>, C>;

/// One archive, opened once, and everything extracted from it.
///
/// Teardown closes the archive, then removes the staging directory and the archive
/// file as [`Cleanup`] dictates. It runs exactly once: on the first [`close`], at the
/// end of [`scoped`], or when the session is dropped, whichever comes first. Every
/// operation after teardown fails with [`Error::Closed`].
///
/// [`close`]: Session::close
/// [`scoped`]: Session::scoped
pub struct Session<A: ArchiveSource, C: Classifier> {
    archive: A,
    classifier: C,
    dirs: Directories,
    cleanup: Cleanup,
    selection: Vec<String>,
    closed: bool,
}

impl<A: ArchiveSource, C: Classifier> Session<A, C> {
    pub fn new(archive: A, classifier: C, dirs: Directories, cleanup: Cleanup) -> Self {
        Self {
            archive,
            classifier,
            dirs,
            cleanup,
            selection: Vec::new(),
            closed: false,
        }
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn cleanup(&self) -> Cleanup {
        self.cleanup
    }

    pub fn base_dir(&self) -> &Path {
        self.dirs.base()
    }

    pub fn set_destination_dir(&mut self, path: impl AsRef<Path>) -> Result<&Path> {
        self.ensure_open()?;
        self.dirs.set_destination(path)
    }

    pub fn set_staging_dir(&mut self, path: impl AsRef<Path>) -> Result<&Path> {
        self.ensure_open()?;
        self.dirs.set_staging(path)
    }

    pub fn destination_dir(&self) -> Option<&Path> {
        self.dirs.destination()
    }

    pub fn staging_dir(&self) -> Option<&Path> {
        self.dirs.staging()
    }

    /// Every file currently in the staging directory, recursively.
    pub fn staged_files(&self) -> Result<Vec<PathBuf>> {
        self.ensure_open()?;
        let staging = self.dirs.require_staging()?;
        Ok(zipgate_fs::list_files(staging)?)
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    pub fn add_selection(&mut self, name: impl Into<String>) -> Result<()> {
        self.ensure_open()?;
        self.selection.push(name.into());
        Ok(())
    }

    pub fn set_selection<I, S>(&mut self, names: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_open()?;
        self.selection = names.into_iter().map(Into::into).collect();
        Ok(())
    }

    pub fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        self.ensure_open()?;
        Ok(self.archive.entries()?)
    }

    /// Add every entry whose extension is allow-listed to the selection, then extract
    /// and relocate the whole selection.
    ///
    /// Entries already selected are not added twice. An empty allow-list adds nothing.
    pub fn by_extension(&mut self, config: &ExtractConfig) -> Result<RelocationReport> {
        self.ensure_pipeline()?;

        let allow = self.classifier.allow_list();
        if allow.is_empty() {
            tracing::warn!("allow-list is empty, no entry can be selected by extension");
        }

        let entries = self.archive.entries()?;
        for name in select::by_extension(&entries, allow) {
            if !self.selection.contains(&name) {
                self.selection.push(name);
            }
        }
        tracing::debug!(selected = self.selection.len(), "selected by extension");

        StagingExtractor::new(&mut self.archive, &self.dirs, &self.classifier, config)?
            .extract(&self.selection)
    }

    /// Replace the selection with the entries matching `requested`, then extract and
    /// relocate them. See [`select::by_names`] for the matching rules.
    pub fn by_names<S: AsRef<str>>(
        &mut self,
        requested: &[S],
        config: &ExtractConfig,
    ) -> Result<RelocationReport> {
        self.ensure_pipeline()?;

        let entries = self.archive.entries()?;
        self.selection = select::by_names(&entries, requested, config.greedy);
        tracing::debug!(
            requested = requested.len(),
            selected = self.selection.len(),
            greedy = config.greedy,
            "selected by name"
        );

        StagingExtractor::new(&mut self.archive, &self.dirs, &self.classifier, config)?
            .extract(&self.selection)
    }

    /// Extract every entry straight into the destination, without staging or
    /// classification. Returns the names of all entries.
    pub fn all(&mut self) -> Result<Vec<String>> {
        self.ensure_open()?;
        let destination = self.dirs.require_destination()?;

        let names = self.archive.extract_all(destination)?;
        tracing::info!(
            entries = names.len(),
            destination = %destination.display(),
            "extracted all entries without validation"
        );
        Ok(names)
    }

    /// Stage `names` and relocate the valid ones, bypassing selection.
    pub fn extract(
        &mut self,
        names: &[String],
        config: &ExtractConfig,
    ) -> Result<RelocationReport> {
        self.ensure_open()?;
        StagingExtractor::new(&mut self.archive, &self.dirs, &self.classifier, config)?
            .extract(names)
    }

    /// Relocate entries that are already staged.
    pub fn relocate(&self, names: &[String], config: &ExtractConfig) -> Result<RelocationReport> {
        self.ensure_open()?;
        Relocator::new(&self.dirs, &self.classifier, config)?.relocate(names)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Tear the session down. Closing again is a no-op.
    ///
    /// Every step runs even if an earlier one fails; the first failure is returned.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_error = None;
        let archive_path = self.archive.path().map(Path::to_path_buf);

        if let Err(e) = self.archive.close() {
            first_error.get_or_insert(Error::from(e));
        }

        if let Err(e) = self.dirs.release_staging(self.cleanup.remove_tmp_dir) {
            first_error.get_or_insert(e);
        }

        if self.cleanup.remove_zip_file {
            match archive_path {
                Some(path) => match zipgate_fs::remove_file(&path) {
                    Ok(()) => tracing::debug!(path = %path.display(), "removed archive file"),
                    Err(e) => {
                        first_error.get_or_insert(Error::from(e));
                    }
                },
                None => tracing::debug!("archive has no file to remove"),
            }
        }

        tracing::debug!(failed = first_error.is_some(), "session closed");
        first_error.map_or(Ok(()), Err)
    }

    /// Run `f` against the session, then tear it down on every exit path.
    ///
    /// An error from `f` wins over a teardown error, which is then only logged.
    pub fn scoped<T, E, F>(mut self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Self) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let outcome = f(&mut self);
        let closed = self.close();

        match (outcome, closed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), closed) => {
                if let Err(close_error) = closed {
                    tracing::warn!(error = %close_error, "session teardown failed");
                }
                Err(e)
            }
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }

    /// Staging and relocation need both directories, checked before the archive is read.
    fn ensure_pipeline(&self) -> Result<()> {
        self.ensure_open()?;
        self.dirs.require_destination()?;
        self.dirs.require_staging()?;
        Ok(())
    }
}

impl<A: ArchiveSource, C: Classifier> Drop for Session<A, C> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "session teardown failed");
        }
    }
}

/// Opens a [`ZipSession`] from a path, with its directories already configured.
///
/// Relative archive, destination and staging paths are resolved against the base,
/// which defaults to the current directory.
#[derive(Clone, Debug)]
pub struct SessionBuilder {
    archive: PathBuf,
    base: PathBuf,
    destination: Option<PathBuf>,
    staging: Option<PathBuf>,
    cleanup: Cleanup,
}

impl SessionBuilder {
    pub fn new(archive: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            base: PathBuf::from("."),
            destination: None,
            staging: None,
            cleanup: Cleanup::default(),
        }
    }

    pub fn base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    pub fn destination(mut self, path: impl Into<PathBuf>) -> Self {
        self.destination = Some(path.into());
        self
    }

    pub fn staging(mut self, path: impl Into<PathBuf>) -> Self {
        self.staging = Some(path.into());
        self
    }

    pub fn cleanup(mut self, cleanup: Cleanup) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Open the archive, then create the directories.
    ///
    /// A failure here tears nothing down: the archive file is never removed before
    /// the session exists.
    pub fn open<C: Classifier>(self, classifier: C) -> Result<ZipSession<C>> {
        let source = ZipSource::open(self.base.join(&self.archive))?;

        let mut dirs = Directories::new(self.base);
        if let Some(destination) = self.destination {
            dirs.set_destination(destination)?;
        }
        if let Some(staging) = self.staging {
            dirs.set_staging(staging)?;
        }

        Ok(Session::new(source, classifier, dirs, self.cleanup))
    }
}
