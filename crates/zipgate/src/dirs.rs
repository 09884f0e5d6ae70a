use std::path::{Path, PathBuf};

use zipgate_fs::Workspace;

use crate::error::{Error, Result};

/// Base, destination and staging directories of a session.
///
/// Relative paths are resolved against the base. Configured directories are created
/// if missing and stored in canonical form. The staging directory is owned as a
/// [`Workspace`] so it is removed if the session is torn down without persisting it.
///
/// The destination may not be the staging directory or lie inside it, since removing
/// staging would then remove accepted files too.
pub struct Directories {
    base: PathBuf,
    destination: Option<PathBuf>,
    staging: Option<Workspace>,
}

impl Directories {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            destination: None,
            staging: None,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn set_destination(&mut self, path: impl AsRef<Path>) -> Result<&Path> {
        let resolved = zipgate_fs::ensure_dir(self.base.join(path))?;
        if let Some(staging) = self.staging() {
            check_overlap(staging, &resolved)?;
        }
        Ok(self.destination.insert(resolved).as_path())
    }

    /// Configure the staging directory. Setting the same directory again is a no-op;
    /// a previously configured, different directory is left on disk.
    pub fn set_staging(&mut self, path: impl AsRef<Path>) -> Result<&Path> {
        let resolved = zipgate_fs::ensure_dir(self.base.join(path))?;
        if let Some(destination) = self.destination() {
            check_overlap(&resolved, destination)?;
        }

        let unchanged = self
            .staging
            .as_ref()
            .is_some_and(|ws| ws.path() == resolved);
        if !unchanged {
            if let Some(previous) = self.staging.take() {
                let kept = previous.persist();
                tracing::debug!(path = %kept.display(), "replaced staging directory");
            }
            self.staging = Some(Workspace::new(&resolved)?);
        }

        self.require_staging()
    }

    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn staging(&self) -> Option<&Path> {
        self.staging.as_ref().map(Workspace::path)
    }

    pub fn require_destination(&self) -> Result<&Path> {
        self.destination().ok_or(Error::MissingDestination)
    }

    pub fn require_staging(&self) -> Result<&Path> {
        self.staging().ok_or(Error::MissingStaging)
    }

    /// Let go of the staging directory, removing it or leaving it on disk.
    pub fn release_staging(&mut self, remove: bool) -> Result<()> {
        match self.staging.take() {
            Some(ws) if remove => {
                let path = ws.path().to_path_buf();
                ws.remove()?;
                tracing::debug!(path = %path.display(), "removed staging directory");
            }
            Some(ws) => {
                ws.persist();
            }
            None => {}
        }
        Ok(())
    }
}

fn check_overlap(staging: &Path, destination: &Path) -> Result<()> {
    if destination.starts_with(staging) {
        return Err(Error::OverlappingDirectories {
            staging: staging.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn setting_directories_twice_is_idempotent() {
        let root = tempdir().unwrap();
        let mut dirs = Directories::new(root.path());

        let first = dirs.set_destination("out").unwrap().to_path_buf();
        let second = dirs.set_destination("out").unwrap().to_path_buf();
        assert_eq!(first, second);
        assert!(first.is_absolute());

        let first = dirs.set_staging("tmp").unwrap().to_path_buf();
        let second = dirs.set_staging("tmp").unwrap().to_path_buf();
        assert_eq!(first, second);
        assert!(second.is_dir());
        dirs.release_staging(false).unwrap();
    }

    #[test]
    fn missing_directories_are_configuration_errors() {
        let dirs = Directories::new(".");
        assert!(matches!(
            dirs.require_destination(),
            Err(Error::MissingDestination)
        ));
        assert!(matches!(dirs.require_staging(), Err(Error::MissingStaging)));
    }

    #[test]
    fn absolute_paths_ignore_base() {
        let root = tempdir().unwrap();
        let mut dirs = Directories::new("/nonexistent-base");
        let dest = dirs.set_destination(root.path().join("abs")).unwrap();
        assert!(dest.ends_with("abs"));
    }

    #[test]
    fn replacing_staging_keeps_old_directory() {
        let root = tempdir().unwrap();
        let mut dirs = Directories::new(root.path());
        dirs.set_staging("one").unwrap();
        dirs.set_staging("two").unwrap();

        assert!(root.path().join("one").is_dir());
        dirs.release_staging(true).unwrap();
        assert!(!root.path().join("two").exists());
        assert!(root.path().join("one").is_dir());
    }

    #[test]
    fn destination_inside_staging_is_rejected() {
        let root = tempdir().unwrap();
        let mut dirs = Directories::new(root.path());
        dirs.set_staging("tmp").unwrap();

        let same = dirs.set_destination("tmp").unwrap_err();
        assert!(matches!(same, Error::OverlappingDirectories { .. }));
        assert!(same.is_configuration());
        let nested = dirs.set_destination("tmp/accepted").unwrap_err();
        assert!(matches!(nested, Error::OverlappingDirectories { .. }));
        assert!(dirs.destination().is_none());

        dirs.set_destination("out").unwrap();
        dirs.release_staging(true).unwrap();
    }

    #[test]
    fn staging_around_destination_is_rejected() {
        let root = tempdir().unwrap();
        let mut dirs = Directories::new(root.path());
        dirs.set_destination("work/out").unwrap();

        for staging in ["work/out", "work"] {
            let err = dirs.set_staging(staging).unwrap_err();
            assert!(matches!(err, Error::OverlappingDirectories { .. }), "{staging}");
        }
        assert!(dirs.staging().is_none());
        assert!(root.path().join("work/out").is_dir());

        // siblings sharing a name prefix do not overlap
        dirs.set_staging("work/out-tmp").unwrap();
        dirs.release_staging(true).unwrap();
    }

    #[test]
    fn dropping_unreleased_staging_removes_it() {
        let root = tempdir().unwrap();
        {
            let mut dirs = Directories::new(root.path());
            dirs.set_staging("tmp").unwrap();
        }
        assert!(!root.path().join("tmp").exists());
    }
}
