use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExcerptError {
    #[error("No root directory given: pass -r <DIR> or set `root` in a preset")]
    ConfigMissing,

    #[error("Suffix list {0:?} contains no usable suffix")]
    InvalidSuffixes(String),

    #[error("Directory does not exist or cannot be accessed: {path}")]
    DirectoryNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory: {path}")]
    DirectoryReadFailure {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("Failed to read file: {path}")]
    FileReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build document: {path}")]
    DocumentBuildFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid glob pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExcerptError>;
