use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use zipgate_archive::sanitize_entry_path;

use crate::config::ExtractConfig;
use crate::error::Result;

/// Maps an archive entry name to its final location under the destination directory.
pub struct PathPolicy<'a> {
    destination: &'a Path,
    config: &'a ExtractConfig,
}

impl<'a> PathPolicy<'a> {
    pub fn new(destination: &'a Path, config: &'a ExtractConfig) -> Self {
        Self {
            destination,
            config,
        }
    }

    /// Compute where `entry` should be copied, creating its parent directories.
    ///
    /// With `same_name` the result may already exist; the copy overwrites it.
    pub fn compute_destination(&self, entry: &str) -> Result<PathBuf> {
        let sanitized = sanitize_entry_path(entry, self.destination)?;
        let relative = sanitized.relative;

        let mut target = self.destination.to_path_buf();
        if self.config.same_structure {
            if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
                target.push(parent);
                zipgate_fs::create_dir_all(&target)?;
            }
        }

        // sanitize_entry_path never yields an empty relative path
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if self.config.renames() {
            let suffix = self
                .config
                .explicit_suffix()
                .unwrap_or_else(|| format!("{}{}", self.config.separator, unique_timestamp()));
            target.push(suffixed_name(&file_name, &suffix));
        } else {
            target.push(file_name);
        }

        Ok(target)
    }
}

/// `report.pdf` + `_v2` → `report_v2.pdf`. Only the last extension is kept apart.
pub fn suffixed_name(file_name: &str, suffix: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();

    match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    }
}

static LAST_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

/// Wall-clock microseconds formatted as `seconds.micros`, strictly increasing per process.
fn unique_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or_default();

    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    let micros = loop {
        let next = now.max(last + 1);
        match LAST_TIMESTAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => break next,
            Err(current) => last = current,
        }
    };

    format!("{}.{:06}", micros / 1_000_000, micros % 1_000_000)
}
