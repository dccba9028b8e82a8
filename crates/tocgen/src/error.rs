//! CLI error types.

use std::path::PathBuf;

use tocgen_config::ConfigError;
use tocgen_content::ContentError;
use tocgen_nav::NavError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Nav(#[from] NavError),

    #[error("{0}")]
    Content(#[from] ContentError),

    #[error("{0} navigation issue(s) found")]
    Stale(usize),

    #[error("{0}")]
    Validation(String),
}
