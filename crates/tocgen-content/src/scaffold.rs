//! Placeholder pages for planned content.
//!
//! Given page paths relative to the documentation root, creates the
//! directories and a stub Markdown file for each page so the navigation
//! builder can list them before they are written. Existing files are
//! never touched.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tocgen_nav::display_name;

use crate::error::ContentError;

/// Summary of a scaffold run.
#[derive(Debug, Default)]
pub struct ScaffoldReport {
    /// Placeholder files created.
    pub created: Vec<PathBuf>,
    /// Directories created (including parents of new pages).
    pub directories: Vec<PathBuf>,
    /// Pages that already existed.
    pub existing: Vec<PathBuf>,
    /// Pages that were rejected or failed.
    pub failures: Vec<ContentError>,
}

/// Parse a page list: one path per line, blank lines and `#` comments ignored.
#[must_use]
pub fn parse_page_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect()
}

/// Placeholder body for a page titled `title`.
#[must_use]
pub fn placeholder_content(title: &str) -> String {
    format!("# {title}\n\n> This page has not been written yet.\n")
}

/// Create placeholder pages under `root`.
///
/// A path ending in `/` creates only the directory. Any other path gets
/// `extension` appended unless it already ends with it. Invalid paths and
/// I/O failures are recorded per page; the remaining pages are still
/// processed.
///
/// # Errors
///
/// Returns [`ContentError::NotFound`] if `root` is not a directory.
pub fn scaffold(
    root: &Path,
    pages: &[String],
    extension: &str,
) -> Result<ScaffoldReport, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::NotFound(root.to_path_buf()));
    }

    let mut report = ScaffoldReport::default();
    for page in pages {
        if let Err(e) = scaffold_page(root, page, extension, &mut report) {
            tracing::warn!(page = %page, error = %e, "Skipping page");
            report.failures.push(e);
        }
    }
    Ok(report)
}

fn scaffold_page(
    root: &Path,
    page: &str,
    extension: &str,
    report: &mut ScaffoldReport,
) -> Result<(), ContentError> {
    let relative = validate_page(page)?;
    let dir_only = page.ends_with('/');

    let (dir, file) = if dir_only {
        (root.join(&relative), None)
    } else {
        let file = root.join(with_extension(&relative, extension));
        let dir = file.parent().unwrap_or(root).to_path_buf();
        (dir, Some(file))
    };

    create_dirs(root, &dir, report)?;

    let Some(file) = file else {
        return Ok(());
    };

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content = placeholder_content(&display_name(&name, false, extension));

    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&file)
    {
        Ok(mut handle) => {
            handle
                .write_all(content.as_bytes())
                .map_err(|e| ContentError::io(&file, e))?;
            tracing::info!(path = %file.display(), "Created placeholder page");
            report.created.push(file);
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            report.existing.push(file);
        }
        Err(e) => return Err(ContentError::io(&file, e)),
    }
    Ok(())
}

/// Create `dir` and its missing ancestors below `root`, recording each one.
fn create_dirs(root: &Path, dir: &Path, report: &mut ScaffoldReport) -> Result<(), ContentError> {
    let mut missing = Vec::new();
    let mut current = dir;
    while current != root && !current.exists() {
        missing.push(current.to_path_buf());
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    for path in missing.into_iter().rev() {
        fs::create_dir(&path).map_err(|e| ContentError::io(&path, e))?;
        report.directories.push(path);
    }
    Ok(())
}

/// Reject paths that would escape the root.
fn validate_page(page: &str) -> Result<PathBuf, ContentError> {
    let invalid = |reason| ContentError::InvalidPage {
        page: page.to_owned(),
        reason,
    };
    let trimmed = page.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("empty path"));
    }

    let mut relative = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir => return Err(invalid("'..' is not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the documentation root"));
            }
        }
    }
    if relative.as_os_str().is_empty() {
        return Err(invalid("empty path"));
    }
    Ok(relative)
}

/// Append `extension` unless the path already ends with it.
fn with_extension(relative: &Path, extension: &str) -> PathBuf {
    let text = relative.to_string_lossy();
    if text.to_lowercase().ends_with(&extension.to_lowercase()) {
        relative.to_path_buf()
    } else {
        PathBuf::from(format!("{text}{extension}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pages(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_parse_page_list() {
        let list = "# planned pages\nnetworking/vlans\n\n  dns/split-horizon.md  \n# done\n";
        assert_eq!(
            parse_page_list(list),
            vec!["networking/vlans", "dns/split-horizon.md"]
        );
    }

    #[test]
    fn test_creates_pages_and_directories() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        let report = scaffold(root, &pages(&["networking/dns/split-horizon"]), ".md").unwrap();

        let page = root.join("networking/dns/split-horizon.md");
        assert_eq!(report.created, vec![page.clone()]);
        assert_eq!(
            report.directories,
            vec![root.join("networking"), root.join("networking/dns")]
        );
        assert_eq!(
            fs::read_to_string(page).unwrap(),
            "# split horizon\n\n> This page has not been written yet.\n"
        );
    }

    #[test]
    fn test_existing_page_untouched() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("intro.md"), "# Real content\n").unwrap();

        let report = scaffold(root, &pages(&["intro.md", "./intro"]), ".md").unwrap();

        assert!(report.created.is_empty());
        assert_eq!(report.existing.len(), 2);
        assert_eq!(fs::read_to_string(root.join("intro.md")).unwrap(), "# Real content\n");
    }

    #[test]
    fn test_directory_only() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        let report = scaffold(root, &pages(&["home-assistant/"]), ".md").unwrap();

        assert!(report.created.is_empty());
        assert_eq!(report.directories, vec![root.join("home-assistant")]);
        assert!(root.join("home-assistant").is_dir());
    }

    #[test]
    fn test_rejects_escaping_paths_but_continues() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();

        let report = scaffold(root, &pages(&["../outside", "/etc/passwd", "ok"]), ".md").unwrap();

        assert_eq!(report.failures.len(), 2);
        assert!(
            report
                .failures
                .iter()
                .all(|e| matches!(e, ContentError::InvalidPage { .. }))
        );
        assert_eq!(report.created, vec![root.join("ok.md")]);
    }

    #[test]
    fn test_missing_root() {
        let result = scaffold(Path::new("/nonexistent/docs"), &pages(&["a"]), ".md");
        assert!(matches!(result, Err(ContentError::NotFound(_))));
    }

    #[test]
    fn test_with_extension() {
        assert_eq!(with_extension(Path::new("a/b"), ".md"), PathBuf::from("a/b.md"));
        assert_eq!(with_extension(Path::new("a/b.MD"), ".md"), PathBuf::from("a/b.MD"));
    }
}
