use std::path::Path;

/// One member of an archive, as listed by an [`ArchiveSource`](crate::ArchiveSource).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path within the archive, `/`-separated.
    pub name: String,
    pub index: usize,
    /// Uncompressed size in bytes.
    pub size: u64,
    pub kind: EntryKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

impl ArchiveEntry {
    pub fn file(name: impl Into<String>, index: usize, size: u64) -> Self {
        Self {
            name: name.into(),
            index,
            size,
            kind: EntryKind::File,
        }
    }

    pub fn directory(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            size: 0,
            kind: EntryKind::Directory,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    /// Last path component, e.g. `b.txt` for `a/b.txt`.
    pub fn file_name(&self) -> Option<&str> {
        Path::new(&self.name).file_name().and_then(|n| n.to_str())
    }

    /// Extension of the last path component, without the dot.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
    }
}
