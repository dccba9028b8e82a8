//! Content maintenance errors.

use std::path::PathBuf;

use tocgen_nav::NavError;

/// Error returned by content maintenance operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The target path does not exist.
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A page path cannot be scaffolded.
    #[error("Invalid page path {page:?}: {reason}")]
    InvalidPage {
        /// Page path as given.
        page: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File or directory path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking the documentation tree failed.
    #[error("{0}")]
    Nav(#[from] NavError),
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
