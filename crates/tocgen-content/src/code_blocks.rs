//! Repair of collapsed fenced code blocks.
//!
//! Some pages were imported with their code blocks flattened: a whole
//! snippet on one line, with literal `\n` sequences where the line breaks
//! used to be, sometimes even glued to the opening fence
//! (`` ```pythonimport os\nprint(os.getcwd()) ``). [`repair_code_blocks`]
//! splits such lines back apart.
//!
//! Only blocks fenced with the configured language are touched, and inside
//! them only lines longer than `min_line_length`. Short lines that happen
//! to contain `\n` (a string literal such as `print("a\nb")`) are left as
//! they are.

use std::fs;
use std::path::{Path, PathBuf};

use tocgen_nav::{NavOptions, collect_documents};

use crate::error::ContentError;

/// A line with a glued opening fence must be longer than this.
const GLUED_FENCE_MIN_LEN: usize = 20;

/// Options for [`repair_code_blocks`].
#[derive(Clone, Debug)]
pub struct RepairOptions {
    /// Fence language to repair (the text after the backticks).
    pub language: String,
    /// Lines with at most this many characters are left alone.
    pub min_line_length: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            language: "python".to_owned(),
            min_line_length: 150,
        }
    }
}

/// Output of [`repair_code_blocks`].
#[derive(Debug, PartialEq, Eq)]
pub struct Repaired {
    /// Repaired content.
    pub content: String,
    /// Line count before.
    pub lines_before: usize,
    /// Line count after.
    pub lines_after: usize,
    /// Number of source lines that were split.
    pub lines_expanded: usize,
}

impl Repaired {
    /// True if anything was split.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.lines_expanded > 0
    }
}

/// Split collapsed lines inside fenced code blocks.
///
/// Line endings (`\n` or `\r\n`) and the presence of a final newline are
/// preserved.
#[must_use]
pub fn repair_code_blocks(content: &str, options: &RepairOptions) -> Repaired {
    let fence = format!("```{}", options.language);
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };

    let mut out: Vec<String> = Vec::new();
    let mut in_block = false;
    let mut lines_before = 0;
    let mut lines_expanded = 0;

    for line in content.lines() {
        lines_before += 1;
        let trimmed = line.trim();

        if trimmed == fence {
            in_block = true;
            out.push(line.to_owned());
        } else if in_block && trimmed.starts_with("```") {
            in_block = false;
            out.push(line.to_owned());
        } else if let Some(idx) = line
            .find(&fence)
            .filter(|_| line.chars().count() > GLUED_FENCE_MIN_LEN)
        {
            if idx > 0 {
                out.push(line[..idx].trim_end().to_owned());
            }
            out.push(fence.clone());
            let rest = &line[idx + fence.len()..];
            if !rest.is_empty() {
                out.extend(split_escaped_lines(rest));
            }
            in_block = true;
            lines_expanded += 1;
        } else if in_block
            && line.contains("\\n")
            && line.chars().count() > options.min_line_length
        {
            out.extend(split_escaped_lines(line));
            lines_expanded += 1;
        } else {
            out.push(line.to_owned());
        }
    }

    let lines_after = out.len();
    let mut repaired = out.join(newline);
    if content.ends_with('\n') {
        repaired.push_str(newline);
    }

    Repaired {
        content: if lines_expanded > 0 {
            repaired
        } else {
            content.to_owned()
        },
        lines_before,
        lines_after,
        lines_expanded,
    }
}

/// Split a line at each literal `\n`.
///
/// `\"` becomes `"`, and an escaped `\\n` is kept as the two characters
/// `\n` instead of being split. Empty pieces between separators become
/// blank lines; a trailing empty piece is dropped.
fn split_escaped_lines(text: &str) -> Vec<String> {
    if !text.contains("\\n") {
        return vec![text.to_owned()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            current.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                pieces.push(std::mem::take(&mut current));
            }
            Some('"') => {
                chars.next();
                current.push('"');
            }
            Some('\\') => {
                chars.next();
                if chars.peek() == Some(&'n') {
                    chars.next();
                    current.push_str("\\n");
                } else {
                    current.push_str("\\\\");
                }
            }
            _ => current.push('\\'),
        }
    }
    pieces.push(current);

    let last = pieces.len() - 1;
    pieces
        .into_iter()
        .enumerate()
        .filter(|(i, piece)| !piece.is_empty() || *i < last)
        .map(|(_, piece)| piece)
        .collect()
}

/// Summary of a repair run over files.
#[derive(Debug, Default)]
pub struct RepairReport {
    /// Files inspected.
    pub files: usize,
    /// Files that were (or, in a dry run, would be) rewritten, with the
    /// line counts before and after.
    pub changed: Vec<(PathBuf, usize, usize)>,
    /// Files that could not be read or written.
    pub failures: Vec<ContentError>,
}

/// Repair one Markdown file, or every document under a directory.
///
/// # Errors
///
/// Returns [`ContentError::NotFound`] if `path` does not exist and
/// [`ContentError::Nav`] if a directory cannot be walked.
pub fn repair_path(
    path: &Path,
    nav: &NavOptions,
    options: &RepairOptions,
    dry_run: bool,
) -> Result<RepairReport, ContentError> {
    let mut report = RepairReport::default();
    let files = if path.is_dir() {
        let documents = collect_documents(path, nav)?;
        report
            .failures
            .extend(documents.failures.into_iter().map(ContentError::from));
        documents.files
    } else if path.is_file() {
        vec![path.to_path_buf()]
    } else {
        return Err(ContentError::NotFound(path.to_path_buf()));
    };

    for file in files {
        repair_file(&file, options, dry_run, &mut report);
    }
    Ok(report)
}

fn repair_file(path: &Path, options: &RepairOptions, dry_run: bool, report: &mut RepairReport) {
    report.files += 1;
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read file");
            report.failures.push(ContentError::io(path, e));
            return;
        }
    };

    let repaired = repair_code_blocks(&content, options);
    if !repaired.changed() {
        return;
    }

    if !dry_run {
        if let Err(e) = fs::write(path, &repaired.content) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to write file");
            report.failures.push(ContentError::io(path, e));
            return;
        }
        tracing::info!(
            path = %path.display(),
            before = repaired.lines_before,
            after = repaired.lines_after,
            "Repaired code blocks"
        );
    }
    report
        .changed
        .push((path.to_path_buf(), repaired.lines_before, repaired.lines_after));
}
