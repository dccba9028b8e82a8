//! `tocgen build` command implementation.

use std::path::Path;

use clap::Args;
use tocgen_nav::IndexBuilder;

use super::{TreeArgs, load_config, nav_options, report_failures};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// Show which navigation files would be created without writing them.
    #[arg(long)]
    dry_run: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// Per-directory failures are printed but do not fail the command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(config_path, &self.tree.settings(), &output)?;

        let builder = IndexBuilder::new(nav_options(&config)?).dry_run(self.dry_run);
        let report = builder.build(&config.docs_resolved.source_dir)?;

        let action = if self.dry_run { "would create" } else { "created" };
        for path in &report.created {
            output.path(action, path);
        }
        report_failures(&output, &report.failures);

        let summary = format!(
            "{} {} navigation file(s); {} already present, {} failed",
            if self.dry_run { "Would create" } else { "Created" },
            report.created.len(),
            report.existing,
            report.failures.len(),
        );
        if report.is_clean() {
            output.success(&summary);
        } else {
            output.warning(&summary);
        }
        Ok(())
    }
}
