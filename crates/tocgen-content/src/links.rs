//! Relative link rewriting by literal substitution.
//!
//! When pages or asset folders move, links in other pages need the same
//! textual fix-up everywhere (`../images/` → `images/`, `.html` → `.md`).
//! Rules apply to link targets only: the `target` in `[text](target)`,
//! `![alt](target)` and reference definitions `[id]: target`. Link text and
//! prose are never touched, and neither are fenced code blocks or inline
//! code spans, where link syntax is only an example.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tocgen_nav::{NavOptions, collect_documents};

use crate::error::ContentError;
use crate::markdown::{Fences, code_spans};

/// Inline link or image: `[text](target "title")`.
static INLINE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(!?\[[^\]]*\]\()([^)\s]+)((?:\s+"[^"]*")?\))"#).unwrap()
});

/// Reference definition at the start of a line: `[id]: target`.
static REFERENCE_DEF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( {0,3}\[[^\]]+\]:[ \t]*)(\S+)").unwrap());

/// A literal substitution applied to link targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkRule {
    /// Text to find.
    pub from: String,
    /// Replacement text.
    pub to: String,
}

impl LinkRule {
    /// Create a rule.
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Output of [`rewrite_links`].
#[derive(Debug, PartialEq, Eq)]
pub struct Rewritten {
    /// Content with link targets rewritten.
    pub content: String,
    /// Number of link targets that changed.
    pub links_changed: usize,
}

/// Apply `rules`, in order, to every link target in `content`.
#[must_use]
pub fn rewrite_links(content: &str, rules: &[LinkRule]) -> Rewritten {
    if rules.is_empty() {
        return Rewritten {
            content: content.to_owned(),
            links_changed: 0,
        };
    }

    let mut out = String::with_capacity(content.len());
    let mut links_changed = 0;
    let mut fences = Fences::default();
    for line in content.split_inclusive('\n') {
        if fences.observe(line) {
            out.push_str(line);
            continue;
        }
        let mut last = 0;
        for span in code_spans(line) {
            let text = &line[last..span.start];
            out.push_str(&rewrite_text(text, last == 0, rules, &mut links_changed));
            out.push_str(&line[span.clone()]);
            last = span.end;
        }
        let rest = &line[last..];
        out.push_str(&rewrite_text(rest, last == 0, rules, &mut links_changed));
    }

    Rewritten {
        content: out,
        links_changed,
    }
}

/// Rewrite link targets in a piece of one line outside code.
///
/// Reference definitions are only recognized at the start of the line.
fn rewrite_text(text: &str, line_start: bool, rules: &[LinkRule], changed: &mut usize) -> String {
    let inline = INLINE_LINK.replace_all(text, |caps: &Captures<'_>| {
        let target = apply_rules(&caps[2], rules);
        if target != caps[2] {
            *changed += 1;
        }
        format!("{}{target}{}", &caps[1], &caps[3])
    });
    if !line_start {
        return inline.into_owned();
    }
    REFERENCE_DEF
        .replace(&inline, |caps: &Captures<'_>| {
            let target = apply_rules(&caps[2], rules);
            if target != caps[2] {
                *changed += 1;
            }
            format!("{}{target}", &caps[1])
        })
        .into_owned()
}

fn apply_rules(target: &str, rules: &[LinkRule]) -> String {
    rules
        .iter()
        .filter(|r| !r.from.is_empty())
        .fold(target.to_owned(), |acc, rule| acc.replace(&rule.from, &rule.to))
}

/// Summary of a link rewriting run.
#[derive(Debug, Default)]
pub struct LinkReport {
    /// Documents inspected.
    pub files: usize,
    /// Files changed (or that would change), with the number of links rewritten.
    pub changed: Vec<(PathBuf, usize)>,
    /// Files or directories that could not be processed.
    pub failures: Vec<ContentError>,
}

impl LinkReport {
    /// Total links rewritten across all files.
    #[must_use]
    pub fn links_changed(&self) -> usize {
        self.changed.iter().map(|(_, n)| n).sum()
    }
}

/// Rewrite link targets in every document under `root`.
///
/// Files are written only when their content changes, and never in a dry run.
///
/// # Errors
///
/// Returns [`ContentError::Nav`] if `root` is not a readable directory.
pub fn rewrite_tree(
    root: &Path,
    nav: &NavOptions,
    rules: &[LinkRule],
    dry_run: bool,
) -> Result<LinkReport, ContentError> {
    let documents = collect_documents(root, nav)?;
    let mut report = LinkReport {
        failures: documents
            .failures
            .into_iter()
            .map(ContentError::from)
            .collect(),
        ..LinkReport::default()
    };

    for file in documents.files {
        report.files += 1;
        let content = match fs::read_to_string(&file) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "Failed to read file");
                report.failures.push(ContentError::io(&file, e));
                continue;
            }
        };

        let rewritten = rewrite_links(&content, rules);
        if rewritten.content == content {
            continue;
        }
        if !dry_run {
            if let Err(e) = fs::write(&file, &rewritten.content) {
                tracing::warn!(path = %file.display(), error = %e, "Failed to write file");
                report.failures.push(ContentError::io(&file, e));
                continue;
            }
            tracing::info!(path = %file.display(), links = rewritten.links_changed, "Rewrote links");
        }
        report.changed.push((file, rewritten.links_changed));
    }

    Ok(report)
}
