//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod fix_code_blocks;
pub(crate) mod fix_links;
pub(crate) mod scaffold;

use std::path::{Path, PathBuf};

use clap::Args;
use tocgen_config::{CliSettings, Config};
use tocgen_nav::NavOptions;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use fix_code_blocks::FixCodeBlocksArgs;
pub(crate) use fix_links::FixLinksArgs;
pub(crate) use scaffold::ScaffoldArgs;

use crate::error::CliError;
use crate::output::Output;

/// Documentation tree selection shared by the tree-walking commands.
#[derive(Args, Debug, Default)]
pub(crate) struct TreeArgs {
    /// Documentation source directory (overrides config).
    #[arg(short, long, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Navigation file name (overrides config, default: toc.yml).
    #[arg(long, value_name = "NAME")]
    pub nav_filename: Option<String>,

    /// Asset folder name excluded from listings (overrides config, default: images).
    #[arg(long, value_name = "NAME")]
    pub asset_dir: Option<String>,
}

impl TreeArgs {
    /// CLI settings carrying these overrides.
    pub(crate) fn settings(&self) -> CliSettings {
        CliSettings {
            source_dir: self.source_dir.clone(),
            nav_filename: self.nav_filename.clone(),
            asset_dir: self.asset_dir.clone(),
            ..CliSettings::default()
        }
    }
}

/// Load configuration and report where the documentation lives.
pub(crate) fn load_config(
    config_path: Option<&Path>,
    settings: &CliSettings,
    output: &Output,
) -> Result<Config, CliError> {
    let config = Config::load(config_path, Some(settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "Loaded configuration");
    }
    output.info(&format!(
        "Source directory: {}",
        config.docs_resolved.source_dir.display()
    ));
    Ok(config)
}

/// Navigation options from the `[nav]` section.
pub(crate) fn nav_options(config: &Config) -> Result<NavOptions, CliError> {
    Ok(NavOptions {
        filename: config.nav.filename.clone(),
        asset_dir: config.nav.asset_dir.clone(),
        extension: config.nav.extension.clone(),
        dirs_first: config.nav.dirs_first,
        exclude: config.nav.exclude_patterns()?,
    })
}

/// Print per-item failures as warnings.
pub(crate) fn report_failures<E: std::fmt::Display>(output: &Output, failures: &[E]) {
    for failure in failures {
        output.warning(&format!("warning: {failure}"));
    }
}
