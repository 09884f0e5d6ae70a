use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory '{path}': {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to copy '{from}' to '{to}': {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("failed to read directory '{path}': {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to resolve '{path}': {source}")]
    Resolve { path: PathBuf, source: io::Error },

    #[error("failed to remove '{path}': {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("path is empty")]
    EmptyPath,
}

impl Error {
    /// Whether the underlying cause is a missing path.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::CreateDir { source, .. }
            | Self::Copy { source, .. }
            | Self::Read { source, .. }
            | Self::Resolve { source, .. }
            | Self::Remove { source, .. } => source.kind() == io::ErrorKind::NotFound,
            Self::EmptyPath => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
