use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The target file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Project root not found: {}", .0.display())]
    ProjectRootNotFound(PathBuf),

    /// The target file exists but could not be read or decoded as UTF-8.
    #[error("Could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern `{pattern}`: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnalysisError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Read { path, source }
        }
    }
}
