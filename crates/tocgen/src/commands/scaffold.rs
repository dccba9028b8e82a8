//! `tocgen scaffold` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use tocgen_content::{parse_page_list, scaffold};

use super::{TreeArgs, load_config, report_failures};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scaffold command.
#[derive(Args)]
pub(crate) struct ScaffoldArgs {
    #[command(flatten)]
    tree: TreeArgs,

    /// Pages to create, relative to the source directory.
    ///
    /// A trailing `/` creates only the directory.
    #[arg(value_name = "PAGE")]
    pages: Vec<String>,

    /// Read additional pages from a file, one per line.
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,
}

impl ScaffoldArgs {
    /// Execute the scaffold command.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<(), CliError> {
        let output = Output::new();

        let mut pages = self.pages;
        if let Some(list) = &self.from {
            pages.extend(read_page_list(list)?);
        }
        if pages.is_empty() {
            return Err(CliError::Validation(
                "no pages given; pass PAGE arguments or --from FILE".to_owned(),
            ));
        }

        let config = load_config(config_path, &self.tree.settings(), &output)?;
        let report = scaffold(
            &config.docs_resolved.source_dir,
            &pages,
            &config.nav.extension,
        )?;

        for dir in &report.directories {
            output.path("mkdir", dir);
        }
        for page in &report.created {
            output.path("created", page);
        }
        for page in &report.existing {
            output.path("exists", page);
        }
        report_failures(&output, &report.failures);

        output.success(&format!(
            "Created {} page(s) and {} director(ies)",
            report.created.len(),
            report.directories.len()
        ));
        Ok(())
    }
}

/// Read a page manifest given with `--from`.
fn read_page_list(path: &Path) -> Result<Vec<String>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_page_list(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_page_list() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("pages.txt");
        std::fs::write(&list, "# planned\ndns/zones\nvlans/\n").unwrap();

        assert_eq!(read_page_list(&list).unwrap(), vec!["dns/zones", "vlans/"]);
    }

    #[test]
    fn test_missing_page_list_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("missing-pages.txt");

        let err = read_page_list(&list).unwrap_err();

        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("missing-pages.txt"));
    }
}
