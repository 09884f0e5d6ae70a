use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek};
use std::path::{Path, PathBuf};

use crate::entry::ArchiveEntry;
use crate::error::{Error, Result};
use crate::sanitize::sanitize_entry_path;
use super::ArchiveSource;

/// [`ArchiveSource`] backed by the `zip` crate.
pub struct ZipSource<R: Read + Seek> {
    archive: Option<zip::ZipArchive<R>>,
    path: Option<PathBuf>,
}

impl ZipSource<BufReader<File>> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let archive = zip::ZipArchive::new(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), entries = archive.len(), "opened zip archive");

        Ok(Self {
            archive: Some(archive),
            path: Some(path.to_path_buf()),
        })
    }
}

impl<R: Read + Seek> ZipSource<R> {
    /// Wrap an in-memory or otherwise unnamed reader.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self {
            archive: Some(archive),
            path: None,
        })
    }

    fn archive(&mut self) -> Result<&mut zip::ZipArchive<R>> {
        self.archive.as_mut().ok_or(Error::Closed)
    }

    /// Extract the entries `keep` accepts. Every accepted name is checked before
    /// anything is written. With [`UnsafeNames::Skip`] an unsafe name is logged and
    /// left out; with [`UnsafeNames::Fail`] it fails the call with `target` untouched.
    fn extract_where(
        &mut self,
        target: &Path,
        unsafe_names: UnsafeNames,
        mut keep: impl FnMut(&str) -> bool,
    ) -> Result<Vec<String>> {
        let archive = self.archive()?;

        let mut planned = Vec::new();
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let name = file.name();
            if !keep(name) {
                continue;
            }

            match sanitize_entry_path(name, target) {
                Ok(sanitized) => {
                    planned.push((i, name.to_string(), sanitized.resolved, file.is_dir()));
                }
                Err(e) if unsafe_names == UnsafeNames::Skip => {
                    tracing::warn!(entry = %name, error = %e, "skipping unsafe entry");
                }
                Err(e) => return Err(e),
            }
        }

        zipgate_fs::create_dir_all(target)?;
        let mut extracted = Vec::with_capacity(planned.len());
        for (i, name, resolved, is_dir) in planned {
            if is_dir {
                zipgate_fs::create_dir_all(&resolved)?;
            } else {
                if let Some(parent) = resolved.parent() {
                    zipgate_fs::create_dir_all(parent)?;
                }
                write_entry(&mut archive.by_index(i)?, &resolved)?;
            }

            tracing::debug!(entry = %name, to = %resolved.display(), "extracted");
            extracted.push(name);
        }

        Ok(extracted)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum UnsafeNames {
    Skip,
    Fail,
}

fn write_entry(reader: &mut impl Read, to: &Path) -> Result<()> {
    let failed = |e: io::Error| Error::ExtractionFailed {
        path: to.to_path_buf(),
        source: e,
    };
    let mut out = File::create(to).map_err(failed)?;
    io::copy(reader, &mut out).map_err(failed)?;
    Ok(())
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn entries(&mut self) -> Result<Vec<ArchiveEntry>> {
        let archive = self.archive()?;
        let mut entries = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let file = archive.by_index_raw(i)?;
            let entry = if file.is_dir() {
                ArchiveEntry::directory(file.name(), i)
            } else {
                ArchiveEntry::file(file.name(), i, file.size())
            };
            entries.push(entry);
        }

        Ok(entries)
    }

    fn extract_entries(&mut self, names: &[String], target: &Path) -> Result<Vec<String>> {
        let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
        let extracted = self.extract_where(target, UnsafeNames::Skip, |name| wanted.contains(name))?;

        if extracted.len() < wanted.len() {
            tracing::debug!(
                requested = wanted.len(),
                extracted = extracted.len(),
                "some requested entries were not extracted"
            );
        }
        Ok(extracted)
    }

    fn extract_all(&mut self, target: &Path) -> Result<Vec<String>> {
        self.extract_where(target, UnsafeNames::Fail, |_| true)
    }

    fn close(&mut self) -> Result<()> {
        if self.archive.take().is_some() {
            tracing::debug!(path = ?self.path, "closed zip archive");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.archive.is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use zip::write::SimpleFileOptions;

    use super::*;

    fn build_zip(files: &[(&str, &[u8])]) -> Cursor<Vec<u8>> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for (name, content) in files {
            if name.ends_with('/') {
                writer.add_directory(*name, options).unwrap();
            } else {
                writer.start_file(*name, options).unwrap();
                writer.write_all(content).unwrap();
            }
        }
        let mut cursor = writer.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn lists_entries_in_archive_order() {
        let data = build_zip(&[("b.txt", b"bb"), ("dir/", b""), ("dir/a.txt", b"a")]);
        let mut source = ZipSource::new(data).unwrap();

        let entries = source.entries().unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["b.txt", "dir/", "dir/a.txt"]);
        assert_eq!(entries[0].size, 2);
        assert!(entries[1].is_directory());
        assert_eq!(entries[2].index, 2);
    }

    #[test]
    fn extracts_only_requested_entries() {
        let data = build_zip(&[("keep/one.txt", b"1"), ("skip.txt", b"2")]);
        let mut source = ZipSource::new(data).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();

        let names = vec!["keep/one.txt".to_string(), "absent.txt".to_string()];
        let extracted = source.extract_entries(&names, temp_dir.path()).unwrap();

        assert_eq!(extracted, ["keep/one.txt"]);
        assert_eq!(std::fs::read(temp_dir.path().join("keep/one.txt")).unwrap(), b"1");
        assert!(!temp_dir.path().join("skip.txt").exists());
    }

    #[test]
    fn extract_all_creates_directories() {
        let data = build_zip(&[("empty/", b""), ("x/y/z.bin", &[0, 1, 2])]);
        let mut source = ZipSource::new(data).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();

        let extracted = source.extract_all(temp_dir.path()).unwrap();

        assert_eq!(extracted.len(), 2);
        assert!(temp_dir.path().join("empty").is_dir());
        assert_eq!(std::fs::read(temp_dir.path().join("x/y/z.bin")).unwrap(), [0, 1, 2]);
    }

    #[test]
    fn unsafe_names_are_skipped_when_extracting_entries() {
        let data = build_zip(&[("good.txt", b"g"), ("../evil.txt", b"e")]);
        let mut source = ZipSource::new(data).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("target");

        let names = vec!["good.txt".to_string(), "../evil.txt".to_string()];
        let extracted = source.extract_entries(&names, &target).unwrap();

        assert_eq!(extracted, ["good.txt"]);
        assert!(target.join("good.txt").is_file());
        assert!(!temp_dir.path().join("evil.txt").exists());
    }

    #[test]
    fn extract_all_fails_before_writing_on_unsafe_name() {
        let data = build_zip(&[("good.txt", b"g"), ("nested/../../evil.txt", b"e")]);
        let mut source = ZipSource::new(data).unwrap();
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("target");

        let result = source.extract_all(&target);

        assert!(matches!(result, Err(Error::ZipSlip { .. })));
        assert!(!target.exists());
        assert!(!temp_dir.path().join("evil.txt").exists());
    }

    #[test]
    fn closed_source_rejects_operations() {
        let data = build_zip(&[("a.txt", b"a")]);
        let mut source = ZipSource::new(data).unwrap();

        source.close().unwrap();
        source.close().unwrap();
        assert!(source.is_closed());
        assert!(matches!(source.entries(), Err(Error::Closed)));
    }

    #[test]
    fn garbage_is_corrupted() {
        let result = ZipSource::new(Cursor::new(vec![0xDE, 0xAD, 0xBE, 0xEF]));
        assert!(matches!(result, Err(Error::Corrupted(_))));
    }
}
