//! Entry selection. Pure functions over an archive listing; they never touch the disk.

use zipgate_archive::ArchiveEntry;

use crate::classify::AllowList;

/// File entries whose extension is a key of the allow-list, in archive order.
///
/// An empty allow-list selects nothing.
pub fn by_extension(entries: &[ArchiveEntry], allow: &AllowList) -> Vec<String> {
    entries
        .iter()
        .filter(|e| e.is_file())
        .filter(|e| e.extension().is_some_and(|ext| allow.contains_extension(ext)))
        .map(|e| e.name.clone())
        .collect()
}

/// File entries matching one of `requested`, in archive order.
///
/// A request matches an entry's full path exactly, or with `greedy`, the entry's bare
/// file name. Entries without an extension never match.
pub fn by_names<S: AsRef<str>>(
    entries: &[ArchiveEntry],
    requested: &[S],
    greedy: bool,
) -> Vec<String> {
    let is_requested = |name: &str| requested.iter().any(|r| r.as_ref() == name);

    entries
        .iter()
        .filter(|e| e.is_file() && e.extension().is_some())
        .filter(|e| {
            is_requested(&e.name) || (greedy && e.file_name().is_some_and(is_requested))
        })
        .map(|e| e.name.clone())
        .collect()
}
