use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_SEPARATOR: &str = "_";

/// Per-pass policy: how entries are matched, where they land and what they are called.
///
/// Passed by reference into every selection strategy, so two passes in the same
/// session can use different policies without touching shared state.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Also match a requested name against the bare file name of every entry.
    pub greedy: bool,
    /// Recreate the entry's directories under the destination.
    pub same_structure: bool,
    /// Keep the original file name. When false a suffix is appended to the stem.
    pub same_name: bool,
    /// Explicit suffix, placed after the separator. Implies renaming.
    pub suffix: Option<String>,
    pub separator: String,
    pub digest: DigestStrategy,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            greedy: true,
            same_structure: true,
            same_name: true,
            suffix: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            digest: DigestStrategy::None,
        }
    }
}

impl ExtractConfig {
    pub fn greedy(mut self, greedy: bool) -> Self {
        self.greedy = greedy;
        self
    }

    pub fn same_structure(mut self, same_structure: bool) -> Self {
        self.same_structure = same_structure;
        self
    }

    pub fn same_name(mut self, same_name: bool) -> Self {
        self.same_name = same_name;
        self
    }

    /// Set an explicit suffix. This also turns renaming on.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self.same_name = false;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn digest(mut self, digest: DigestStrategy) -> Self {
        self.digest = digest;
        self
    }

    /// Whether relocated files get a suffixed name.
    pub fn renames(&self) -> bool {
        !self.same_name || self.suffix.is_some()
    }

    /// The explicit suffix with its separator, if one was set.
    pub fn explicit_suffix(&self) -> Option<String> {
        self.suffix
            .as_deref()
            .map(|suffix| format!("{}{}", self.separator, suffix))
    }
}

/// Teardown behavior, fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Cleanup {
    pub remove_zip_file: bool,
    pub remove_tmp_dir: bool,
}

impl Default for Cleanup {
    fn default() -> Self {
        Self {
            remove_zip_file: false,
            remove_tmp_dir: true,
        }
    }
}

impl Cleanup {
    pub fn remove_zip_file(mut self, remove: bool) -> Self {
        self.remove_zip_file = remove;
        self
    }

    pub fn remove_tmp_dir(mut self, remove: bool) -> Self {
        self.remove_tmp_dir = remove;
        self
    }
}

/// Content digest recorded for every accepted file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestStrategy {
    #[default]
    None,
    Sha256,
}

impl DigestStrategy {
    /// Compute the digest of a file (streaming).
    pub fn compute(&self, path: &Path) -> io::Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Sha256 => {
                use sha2::Digest;
                let mut reader = File::open(path)?;
                let mut hasher = sha2::Sha256::new();
                io::copy(&mut reader, &mut hasher)?;
                Ok(Some(hex::encode(hasher.finalize())))
            }
        }
    }
}
