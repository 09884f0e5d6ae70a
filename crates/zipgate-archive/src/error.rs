use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("archive is corrupted: {0}")]
    Corrupted(#[from] zip::result::ZipError),

    #[error("zip-slip attack detected: entry '{entry}' resolves to '{resolved}'")]
    ZipSlip { entry: PathBuf, resolved: PathBuf },

    #[error("entry path is empty or contains a null byte: '{0}'")]
    InvalidPath(String),

    #[error("failed to open archive '{path}': {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    #[error("failed to extract '{path}': {source}")]
    ExtractionFailed { path: PathBuf, source: io::Error },

    #[error("failed to create directory: {source}")]
    DirectoryCreationFailed { source: zipgate_fs::Error },

    #[error("archive is closed")]
    Closed,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<zipgate_fs::Error> for Error {
    fn from(e: zipgate_fs::Error) -> Self {
        Self::DirectoryCreationFailed { source: e }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
