//! Filesystem primitives for staged archive relocation.
//!
//! Every operation maps `io::Error` into [`Error`] with the offending path attached,
//! so callers can decide which failures are per-file and which are fatal.

mod error;
mod workspace;

pub use error::{Error, Result};
pub use workspace::Workspace;

use std::io;
use std::path::{Path, PathBuf};

/// Create `path` and any missing parents, then return its canonical form.
///
/// An existing directory is not an error, so calling this twice yields the same path.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::EmptyPath);
    }

    create_dir_all(path)?;
    resolve(path)
}

/// Idempotent `mkdir -p`.
pub fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::create_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(e) => Err(Error::CreateDir {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Canonical absolute path with symlinks resolved. Fails if `path` does not exist.
pub fn resolve(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    std::fs::canonicalize(path).map_err(|e| Error::Resolve {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Binary copy that overwrites `to` if it already exists.
pub fn copy_file(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<u64> {
    let (from, to) = (from.as_ref(), to.as_ref());
    std::fs::copy(from, to).map_err(|e| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

/// Every regular file under `dir`, recursively, sorted. Symlinks are not followed.
pub fn list_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir.as_ref(), &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let read = |e: io::Error| Error::Read {
        path: dir.to_path_buf(),
        source: e,
    };

    for entry in std::fs::read_dir(dir).map_err(read)? {
        let entry = entry.map_err(read)?;
        let file_type = entry.file_type().map_err(read)?;
        if file_type.is_dir() {
            collect_files(&entry.path(), files)?;
        } else if file_type.is_file() {
            files.push(entry.path());
        }
    }
    Ok(())
}

/// Remove a directory tree. A tree that is already gone counts as removed.
pub fn remove_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Remove a single file. A file that is already gone counts as removed.
pub fn remove_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
