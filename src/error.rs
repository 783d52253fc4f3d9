use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a report run.
///
/// Malformed benchmark entries are not errors; they are dropped by the
/// record parser. Everything here stops the pipeline.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input document path does not exist.
    #[error("benchmark file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not JSON or lacks the top-level `benchmarks` field.
    #[error("invalid benchmark document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize run summary: {0}")]
    Summary(#[source] serde_json::Error),

    #[error("failed to render {artifact}: {message}")]
    Render { artifact: String, message: String },
}

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
