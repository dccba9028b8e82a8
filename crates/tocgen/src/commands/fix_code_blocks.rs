//! `tocgen fix-code-blocks` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tocgen_content::{RepairOptions, repair_path};

use super::{TreeArgs, load_config, nav_options, report_failures};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fix-code-blocks command.
#[derive(Args)]
pub(crate) struct FixCodeBlocksArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// File or directory to repair (default: source directory).
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Fence language to repair (overrides config, default: python).
    #[arg(long, value_name = "LANG")]
    language: Option<String>,

    /// Only lines longer than this are repaired (overrides config, default: 150).
    #[arg(long, value_name = "CHARS")]
    min_line_length: Option<usize>,

    /// Report changes without writing files.
    #[arg(long)]
    dry_run: bool,
}

impl FixCodeBlocksArgs {
    /// Execute the fix-code-blocks command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let mut settings = self.tree.settings();
        settings.code_language = self.language;
        settings.min_line_length = self.min_line_length;
        let config = load_config(config_path, &settings, &output)?;

        let target = self
            .path
            .unwrap_or_else(|| config.docs_resolved.source_dir.clone());
        let options = RepairOptions {
            language: config.code_blocks.language.clone(),
            min_line_length: config.code_blocks.min_line_length,
        };
        let report = repair_path(&target, &nav_options(&config)?, &options, self.dry_run)?;

        for (path, before, after) in &report.changed {
            let action = if self.dry_run { "would fix" } else { "fixed" };
            output.path(action, path);
            output.info(&format!("{:>12} {before} -> {after} lines", ""));
        }
        report_failures(&output, &report.failures);

        output.success(&format!(
            "{} {} of {} file(s)",
            if self.dry_run { "Would repair" } else { "Repaired" },
            report.changed.len(),
            report.files
        ));
        Ok(())
    }
}
