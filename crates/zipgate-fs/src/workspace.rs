use std::path::{Path, PathBuf};

use crate::Result;

/// A staging directory that is removed when dropped unless persisted.
pub struct Workspace {
    root: PathBuf,
    armed: bool,
}

impl Workspace {
    /// Create (or reuse) `root` and take ownership of its cleanup.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = crate::ensure_dir(root)?;
        Ok(Self { root, armed: true })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path inside the workspace.
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Give up cleanup and leave the directory on disk.
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.root)
    }

    /// Remove the directory now, reporting failure instead of swallowing it.
    pub fn remove(mut self) -> Result<()> {
        self.armed = false;
        crate::remove_dir_all(&self.root)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = crate::remove_dir_all(&self.root) {
                tracing::warn!(error = %e, "failed to remove workspace on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_cleanup_on_drop() -> Result<()> {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        {
            let workspace = Workspace::new(&staging)?;
            std::fs::write(workspace.join("file.txt"), "data").unwrap();
            assert!(staging.exists());
        }
        assert!(!staging.exists());
        Ok(())
    }

    #[test]
    fn test_workspace_persist() -> Result<()> {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        let workspace = Workspace::new(&staging)?;
        let kept = workspace.persist();
        assert!(kept.is_dir());
        assert!(staging.exists());
        Ok(())
    }

    #[test]
    fn test_workspace_remove() -> Result<()> {
        let dir = tempdir().unwrap();
        let workspace = Workspace::new(dir.path().join("staging"))?;
        std::fs::create_dir_all(workspace.join("a/b")).unwrap();
        workspace.remove()?;
        assert!(!dir.path().join("staging").exists());
        Ok(())
    }

    #[test]
    fn test_workspace_reuses_existing_dir() -> Result<()> {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        std::fs::create_dir(&staging).unwrap();
        std::fs::write(staging.join("keep.txt"), "x").unwrap();

        let workspace = Workspace::new(&staging)?;
        assert!(workspace.join("keep.txt").exists());
        workspace.persist();
        Ok(())
    }
}
