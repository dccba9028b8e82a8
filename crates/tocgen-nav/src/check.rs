//! Drift detection for existing navigation files.
//!
//! The builder never touches a navigation file once it exists, so files
//! fall out of date as pages are added, renamed, or removed. The checker
//! walks the same directories and reports the differences without writing.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::entry::{NavEntry, read_nav_file};
use crate::error::NavError;
use crate::listing::{DirListing, NavOptions, Walker};

/// One problem found by [`check_indexes`].
#[derive(Debug)]
pub enum Issue {
    /// Directory has listable children but no navigation file.
    Absent {
        /// Directory path.
        dir: PathBuf,
    },
    /// A child is not linked from its directory's navigation file.
    Missing {
        /// Navigation file path.
        nav_file: PathBuf,
        /// Child name.
        child: String,
    },
    /// A relative link points at nothing.
    Dangling {
        /// Navigation file path.
        nav_file: PathBuf,
        /// Link as written.
        href: String,
    },
    /// The navigation file could not be read or parsed.
    Unreadable {
        /// Navigation file path.
        nav_file: PathBuf,
        /// Underlying error.
        error: NavError,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent { dir } => write!(f, "{}: no navigation file", dir.display()),
            Self::Missing { nav_file, child } => {
                write!(f, "{}: '{child}' is not listed", nav_file.display())
            }
            Self::Dangling { nav_file, href } => {
                write!(f, "{}: '{href}' does not exist", nav_file.display())
            }
            Self::Unreadable { error, .. } => write!(f, "{error}"),
        }
    }
}

/// Result of a check run.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Directories visited.
    pub directories: usize,
    /// Navigation files inspected.
    pub nav_files: usize,
    /// Problems found.
    pub issues: Vec<Issue>,
    /// Directories that could not be listed.
    pub failures: Vec<NavError>,
}

impl CheckReport {
    /// True if nothing is out of date and every directory was readable.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.failures.is_empty()
    }
}

/// Compare every navigation file under `root` with its directory.
///
/// # Errors
///
/// Returns [`NavError::InvalidRoot`] if `root` is not a readable directory.
pub fn check_indexes(root: &Path, options: &NavOptions) -> Result<CheckReport, NavError> {
    let walker = Walker::new(root, options);
    walker.validate_root()?;

    let mut report = CheckReport::default();
    walker.walk(&mut |listing: Result<DirListing, NavError>| {
        report.directories += 1;
        match listing {
            Ok(listing) => check_directory(&listing, options, &mut report),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping directory");
                report.failures.push(e);
            }
        }
    });
    Ok(report)
}

fn check_directory(listing: &DirListing, options: &NavOptions, report: &mut CheckReport) {
    if !listing.has_nav_file {
        if !listing.children.is_empty() {
            report.issues.push(Issue::Absent {
                dir: listing.dir.clone(),
            });
        }
        return;
    }

    let nav_file = listing.nav_path(options);
    report.nav_files += 1;
    let entries = match read_nav_file(&nav_file) {
        Ok(entries) => entries,
        Err(error) => {
            report.issues.push(Issue::Unreadable { nav_file, error });
            return;
        }
    };

    let hrefs = local_hrefs(&entries);

    for child in &listing.children {
        let linked = hrefs
            .iter()
            .any(|href| href.split('/').next() == Some(child.name.as_str()));
        if !linked {
            report.issues.push(Issue::Missing {
                nav_file: nav_file.clone(),
                child: child.name.clone(),
            });
        }
    }

    let mut seen = Vec::new();
    for entry in &entries {
        entry.for_each_href(&mut |href| {
            let Some(target) = local_target(href) else {
                return;
            };
            if !listing.dir.join(target).exists() && !seen.contains(&href) {
                seen.push(href);
                report.issues.push(Issue::Dangling {
                    nav_file: nav_file.clone(),
                    href: href.to_owned(),
                });
            }
        });
    }
}

/// All relative link targets in `entries`, normalized.
fn local_hrefs(entries: &[NavEntry]) -> Vec<&str> {
    let mut hrefs = Vec::new();
    for entry in entries {
        entry.for_each_href(&mut |href| {
            if let Some(target) = local_target(href) {
                hrefs.push(target);
            }
        });
    }
    hrefs
}

/// Strip `./`, query and fragment from a relative link.
///
/// Returns `None` for external, absolute, and fragment-only links.
fn local_target(href: &str) -> Option<&str> {
    if href.is_empty() || href.starts_with(['/', '#']) || href.contains(':') {
        return None;
    }
    let end = href.find(['#', '?']).unwrap_or(href.len());
    let target = href[..end].trim_start_matches("./");
    (!target.is_empty()).then_some(target)
}
