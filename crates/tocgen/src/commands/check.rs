//! `tocgen check` command implementation.

use std::path::Path;

use clap::Args;
use tocgen_nav::check_indexes;

use super::{TreeArgs, load_config, nav_options, report_failures};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    tree: TreeArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// Fails with [`CliError::Stale`] when any navigation file is out of date.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(config_path, &self.tree.settings(), &output)?;

        let report = check_indexes(&config.docs_resolved.source_dir, &nav_options(&config)?)?;

        for issue in &report.issues {
            output.warning(&issue.to_string());
        }
        report_failures(&output, &report.failures);

        if report.is_clean() {
            output.success(&format!(
                "{} navigation file(s) up to date",
                report.nav_files
            ));
            return Ok(());
        }
        Err(CliError::Stale(report.issues.len() + report.failures.len()))
    }
}
