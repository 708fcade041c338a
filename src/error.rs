//! Packaging error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("{} is in the way", path.display())]
    DestinationExists { path: PathBuf },

    #[error("No such file: {}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Pattern matched no files: {pattern}")]
    UnmatchedPattern { pattern: String },

    #[error("Invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl PackError {
    /// Wrap an IO error raised while opening `path`, keeping not-found
    /// failures distinguishable from other IO errors.
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            PackError::MissingFile {
                path: path.into(),
                source,
            }
        } else {
            PackError::Io(source)
        }
    }
}

pub type Result<T> = std::result::Result<T, PackError>;
