//! Navigation entries and the YAML navigation file format.
//!
//! A navigation file is a YAML list of `name`/`href` maps:
//!
//! ```yaml
//! - name: intro
//!   href: intro.md
//! - name: examples
//!   href: examples/toc.yml
//! ```
//!
//! Hand-written files may nest entries under `items`, omit `href` on a
//! grouping node, or wrap the whole list in a top-level `items:` map.
//! All three shapes are accepted when reading.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::NavError;
use crate::listing::has_extension;

/// One navigation entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    /// Display name shown in the sidebar.
    pub name: String,
    /// Link relative to the directory holding the navigation file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavEntry>,
}

impl NavEntry {
    /// Create a leaf entry.
    #[must_use]
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: Some(href.into()),
            items: Vec::new(),
        }
    }

    /// Visit every `href` in this entry and its descendants, depth first.
    pub fn for_each_href<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        if let Some(href) = &self.href {
            f(href);
        }
        for item in &self.items {
            item.for_each_href(f);
        }
    }
}

/// Accepted top-level shapes of a navigation file.
#[derive(Deserialize)]
#[serde(untagged)]
enum NavDocument {
    List(Vec<NavEntry>),
    Root { items: Vec<NavEntry> },
}

/// Derive a display name from a file or directory name.
///
/// Hyphens become spaces. For files, a trailing `extension` (compared
/// ASCII case-insensitively) is removed; other extensions are kept.
///
/// ```
/// use tocgen_nav::display_name;
///
/// assert_eq!(display_name("my-topic.md", false, ".md"), "my topic");
/// assert_eq!(display_name("my-topic", true, ".md"), "my topic");
/// assert_eq!(display_name("diagram.pdf", false, ".md"), "diagram.pdf");
/// ```
#[must_use]
pub fn display_name(file_name: &str, is_dir: bool, extension: &str) -> String {
    let stem = if is_dir {
        file_name
    } else {
        strip_extension(file_name, extension)
    };
    stem.replace('-', " ")
}

/// Remove `extension` from the end of `file_name` if present.
///
/// A name that is nothing but the extension (e.g. `.md`) is returned whole.
fn strip_extension<'a>(file_name: &'a str, extension: &str) -> &'a str {
    if extension.is_empty() || !has_extension(file_name, extension) {
        return file_name;
    }
    &file_name[..file_name.len() - extension.len()]
}

/// Link target for a child of a directory.
///
/// Subdirectories link to their own navigation file.
#[must_use]
pub fn link_target(file_name: &str, is_dir: bool, nav_filename: &str) -> String {
    if is_dir {
        format!("{file_name}/{nav_filename}")
    } else {
        file_name.to_owned()
    }
}

/// Render entries in the navigation file format.
///
/// # Errors
///
/// Returns [`NavError::Serialize`] if YAML serialization fails.
pub fn to_yaml(entries: &[NavEntry]) -> Result<String, NavError> {
    serde_yaml::to_string(entries).map_err(NavError::Serialize)
}

/// Parse navigation file content.
///
/// Empty content yields no entries.
///
/// # Errors
///
/// Returns [`NavError::Parse`] tagged with `path` when the YAML is invalid.
pub fn parse_nav(content: &str, path: &Path) -> Result<Vec<NavEntry>, NavError> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: NavDocument =
        serde_yaml::from_str(content).map_err(|source| NavError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match document {
        NavDocument::List(entries) | NavDocument::Root { items: entries } => entries,
    })
}

/// Read and parse a navigation file.
///
/// # Errors
///
/// Returns [`NavError::DirectoryAccess`] if the file cannot be read and
/// [`NavError::Parse`] if it is not valid.
pub fn read_nav_file(path: &Path) -> Result<Vec<NavEntry>, NavError> {
    let content = fs::read_to_string(path).map_err(|e| NavError::access(path, e))?;
    parse_nav(&content, path)
}

/// Outcome of [`write_nav_file`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WriteOutcome {
    Created,
    AlreadyExists,
}

/// Create a navigation file, never replacing an existing one.
///
/// A file that cannot be written completely is removed again, so a failed
/// run never leaves a truncated navigation file that later runs would skip.
pub(crate) fn write_nav_file(path: &Path, entries: &[NavEntry]) -> Result<WriteOutcome, NavError> {
    let content = to_yaml(entries)?;
    let file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Ok(WriteOutcome::AlreadyExists);
        }
        Err(e) => return Err(NavError::access(path, e)),
    };
    finish_write(path, file, content.as_bytes())?;
    Ok(WriteOutcome::Created)
}

/// Write `content` to the freshly created `path`, removing it on failure.
fn finish_write(path: &Path, mut writer: impl Write, content: &[u8]) -> Result<(), NavError> {
    let Err(e) = writer.write_all(content).and_then(|()| writer.flush()) else {
        return Ok(());
    };
    drop(writer);
    if let Err(remove) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %remove, "Failed to remove partial navigation file");
    }
    Err(NavError::access(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_name_file() {
        assert_eq!(display_name("my-topic.md", false, ".md"), "my topic");
        assert_eq!(display_name("intro.md", false, ".md"), "intro");
        assert_eq!(display_name("dns-and-dhcp-basics.md", false, ".md"), "dns and dhcp basics");
    }

    #[test]
    fn test_display_name_directory() {
        assert_eq!(display_name("my-topic", true, ".md"), "my topic");
        // Directories never lose a suffix
        assert_eq!(display_name("notes.md", true, ".md"), "notes.md");
    }

    #[test]
    fn test_display_name_extension_case_insensitive() {
        assert_eq!(display_name("README.MD", false, ".md"), "README");
    }

    #[test]
    fn test_display_name_other_extension_kept() {
        assert_eq!(display_name("setup-script.ps1", false, ".md"), "setup script.ps1");
    }

    #[test]
    fn test_display_name_only_extension() {
        assert_eq!(display_name(".md", false, ".md"), ".md");
    }

    #[test]
    fn test_display_name_multibyte() {
        assert_eq!(display_name("café-notes.md", false, ".md"), "café notes");
        assert_eq!(display_name("é", false, ".md"), "é");
    }

    #[test]
    fn test_link_target() {
        assert_eq!(link_target("intro.md", false, "toc.yml"), "intro.md");
        assert_eq!(link_target("my-topic", true, "toc.yml"), "my-topic/toc.yml");
    }

    #[test]
    fn test_to_yaml_format() {
        let entries = vec![
            NavEntry::new("intro", "intro.md"),
            NavEntry::new("examples", "examples/toc.yml"),
        ];
        assert_eq!(
            to_yaml(&entries).unwrap(),
            "- name: intro\n  href: intro.md\n- name: examples\n  href: examples/toc.yml\n"
        );
    }

    #[test]
    fn test_parse_list() {
        let yaml = "- name: intro\n  href: intro.md\n";
        let entries = parse_nav(yaml, Path::new("toc.yml")).unwrap();
        assert_eq!(entries, vec![NavEntry::new("intro", "intro.md")]);
    }

    #[test]
    fn test_parse_nested_items() {
        let yaml = r"
- name: Networking
  items:
    - name: dns
      href: dns/toc.yml
    - name: vlans
      href: vlans.md
- name: home
  href: index.md
";
        let entries = parse_nav(yaml, Path::new("toc.yml")).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].href.is_none());
        assert_eq!(entries[0].items.len(), 2);

        let mut hrefs = Vec::new();
        for entry in &entries {
            entry.for_each_href(&mut |h| hrefs.push(h));
        }
        assert_eq!(hrefs, vec!["dns/toc.yml", "vlans.md", "index.md"]);
    }

    #[test]
    fn test_parse_root_items_map() {
        let yaml = "items:\n  - name: intro\n    href: intro.md\n";
        let entries = parse_nav(yaml, Path::new("toc.yml")).unwrap();
        assert_eq!(entries, vec![NavEntry::new("intro", "intro.md")]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_nav("  \n", Path::new("toc.yml")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_reports_path() {
        let err = parse_nav("- name: [broken", Path::new("guides/toc.yml")).unwrap_err();
        assert!(matches!(err, NavError::Parse { .. }));
        assert!(err.to_string().contains("guides/toc.yml"));
    }

    #[test]
    fn test_write_nav_file_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.yml");
        fs::write(&path, "# hand written\n").unwrap();

        let outcome = write_nav_file(&path, &[NavEntry::new("a", "a.md")]).unwrap();

        assert_eq!(outcome, WriteOutcome::AlreadyExists);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hand written\n");
    }

    /// Accepts a few bytes, then fails like a full disk.
    struct FullDisk {
        room: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.room == 0 {
                return Err(std::io::Error::other("no space left on device"));
            }
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.yml");
        fs::write(&path, "- name: tr").unwrap();

        let err = finish_write(&path, FullDisk { room: 10 }, b"- name: truncated\n").unwrap_err();

        assert!(matches!(err, NavError::DirectoryAccess { .. }));
        assert_eq!(err.path(), Some(path.as_path()));
        assert!(!path.exists());
    }

    #[test]
    fn test_finish_write_keeps_complete_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.yml");
        fs::write(&path, "").unwrap();

        finish_write(&path, FullDisk { room: 64 }, b"- name: a\n").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toc.yml");
        let entries = vec![NavEntry::new("my topic", "my-topic.md")];

        assert_eq!(write_nav_file(&path, &entries).unwrap(), WriteOutcome::Created);
        assert_eq!(read_nav_file(&path).unwrap(), entries);
    }
}
