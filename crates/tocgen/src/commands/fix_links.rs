//! `tocgen fix-links` command implementation.

use std::path::Path;

use clap::Args;
use tocgen_content::{LinkRule, rewrite_tree};

use super::{TreeArgs, load_config, nav_options, report_failures};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the fix-links command.
#[derive(Args)]
pub(crate) struct FixLinksArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// Text to replace in link targets (repeatable, paired with --to).
    ///
    /// When given, replaces the `[[links.rewrite]]` rules from config.
    #[arg(long, value_name = "TEXT", requires = "to")]
    from: Vec<String>,

    /// Replacement text (repeatable, paired with --from).
    #[arg(long, value_name = "TEXT", requires = "from")]
    to: Vec<String>,

    /// Report changes without writing files.
    #[arg(long)]
    dry_run: bool,
}

impl FixLinksArgs {
    /// Execute the fix-links command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();
        let config = load_config(config_path, &self.tree.settings(), &output)?;

        let rules: Vec<LinkRule> = if self.from.is_empty() {
            config
                .links
                .rewrite
                .iter()
                .map(|rule| LinkRule::new(rule.from.as_str(), rule.to.as_str()))
                .collect()
        } else {
            paired_rules(self.from, self.to)?
        };
        if rules.is_empty() {
            return Err(CliError::Validation(
                "no rewrite rules; pass --from/--to or add [[links.rewrite]] to config"
                    .to_owned(),
            ));
        }

        let report = rewrite_tree(
            &config.docs_resolved.source_dir,
            &nav_options(&config)?,
            &rules,
            self.dry_run,
        )?;

        let action = if self.dry_run { "would fix" } else { "fixed" };
        for (path, count) in &report.changed {
            output.path(action, path);
            tracing::info!(path = %path.display(), links = count, "Rewrote links");
        }
        report_failures(&output, &report.failures);

        output.success(&format!(
            "{} {} link(s) in {} of {} file(s)",
            if self.dry_run { "Would rewrite" } else { "Rewrote" },
            report.links_changed(),
            report.changed.len(),
            report.files
        ));
        Ok(())
    }
}

/// Zip `--from` and `--to` values into rules.
fn paired_rules(from: Vec<String>, to: Vec<String>) -> Result<Vec<LinkRule>, CliError> {
    if from.len() != to.len() {
        return Err(CliError::Validation(format!(
            "--from given {} time(s) but --to given {} time(s)",
            from.len(),
            to.len()
        )));
    }
    Ok(from.into_iter().zip(to).map(|(f, t)| LinkRule::new(f, t)).collect())
}
