//! Navigation error types.

use std::path::PathBuf;

/// Error returned by navigation operations.
///
/// [`NavError::InvalidRoot`] is fatal and raised before anything is written.
/// The other variants describe a single directory or file; the walk records
/// them and moves on to the next directory.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Documentation root is missing, not a directory, or unreadable.
    #[error("Documentation root {} is not a readable directory", .path.display())]
    InvalidRoot {
        /// Root path as given.
        path: PathBuf,
        /// Underlying I/O error, if there was one.
        #[source]
        source: Option<std::io::Error>,
    },

    /// A directory could not be listed or its navigation file written.
    #[error("Cannot access {}: {source}", .path.display())]
    DirectoryAccess {
        /// Directory or file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An existing navigation file is not valid YAML.
    #[error("Cannot parse {}: {source}", .path.display())]
    Parse {
        /// Navigation file path.
        path: PathBuf,
        /// YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Entries could not be serialized.
    #[error("Cannot serialize navigation entries: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl NavError {
    pub(crate) fn access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            source,
        }
    }

    /// Path the error refers to, when there is one.
    #[must_use]
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::InvalidRoot { path, .. }
            | Self::DirectoryAccess { path, .. }
            | Self::Parse { path, .. } => Some(path),
            Self::Serialize(_) => None,
        }
    }
}
