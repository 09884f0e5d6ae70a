use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no destination directory configured")]
    MissingDestination,

    #[error("no staging directory configured")]
    MissingStaging,

    #[error("destination '{destination}' is inside staging directory '{staging}'")]
    OverlappingDirectories { staging: PathBuf, destination: PathBuf },

    #[error("session is closed")]
    Closed,

    #[error("failed to classify '{path}': {source}")]
    Classify { path: PathBuf, source: io::Error },

    #[error("no known mime type for extension '{0}'")]
    UnknownExtension(String),

    #[error(transparent)]
    Archive(#[from] zipgate_archive::Error),

    #[error(transparent)]
    Fs(#[from] zipgate_fs::Error),
}

impl Error {
    /// Errors caused by how the directories are set, raised before the archive is read.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingDestination | Self::MissingStaging | Self::OverlappingDirectories { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
