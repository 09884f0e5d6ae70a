use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Result of sanitizing an archive entry path.
#[derive(Clone, Debug)]
pub struct SanitizedPath {
    /// Normalized path relative to the base.
    pub relative: PathBuf,
    /// `base` joined with `relative`.
    pub resolved: PathBuf,
}

/// Resolve an entry name under `base`, rejecting anything that would land outside it.
///
/// Backslashes are treated as separators, `.` is dropped and `..` pops a component.
/// Absolute names and names that climb above `base` are a zip-slip.
pub fn sanitize_entry_path(entry: &str, base: impl AsRef<Path>) -> Result<SanitizedPath> {
    let base = base.as_ref();
    if entry.is_empty() || entry.contains('\0') {
        return Err(Error::InvalidPath(entry.to_string()));
    }

    let unified = entry.replace('\\', "/");
    let raw = Path::new(&unified);

    let mut relative = PathBuf::new();
    for component in raw.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !relative.pop() {
                    return Err(zip_slip(entry, base.join(raw)));
                }
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(zip_slip(entry, raw.to_path_buf()));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::InvalidPath(entry.to_string()));
    }

    Ok(SanitizedPath {
        resolved: base.join(&relative),
        relative,
    })
}

fn zip_slip(entry: &str, resolved: PathBuf) -> Error {
    Error::ZipSlip {
        entry: PathBuf::from(entry),
        resolved,
    }
}
