use std::path::PathBuf;

/// Outcome of one relocation pass, in archive order within each category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RelocationReport {
    pub accepted: Vec<Accepted>,
    /// Staged files whose content the classifier refused.
    pub rejected: Vec<Rejected>,
    /// Requested entries with no staged file behind them.
    pub missing: Vec<String>,
    /// Valid or unclassifiable files that could not be read, hashed or copied.
    pub failed: Vec<Failed>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Accepted {
    pub entry: String,
    /// Canonical path of the copy.
    pub path: PathBuf,
    pub mime_type: String,
    pub digest: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejected {
    pub entry: String,
    pub mime_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Failed {
    pub entry: String,
    pub reason: String,
}

impl RelocationReport {
    /// The files that made it, in archive order.
    pub fn realized_paths(&self) -> Vec<PathBuf> {
        self.accepted.iter().map(|a| a.path.clone()).collect()
    }

    pub fn into_realized_paths(self) -> Vec<PathBuf> {
        self.accepted.into_iter().map(|a| a.path).collect()
    }

    /// Number of entries the pass looked at.
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len() + self.missing.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty() && self.missing.is_empty() && self.failed.is_empty()
    }
}
