//! Navigation file generation.
//!
//! [`IndexBuilder`] writes a navigation file into every directory that has
//! listable children and no navigation file yet. Existing navigation files
//! are never read, rewritten, or removed, so a second run over an unchanged
//! tree writes nothing.
//!
//! Directories with nothing to list get no navigation file and are left out
//! of their parent's entries, so every generated directory link resolves.

use std::path::{Path, PathBuf};

use crate::entry::{NavEntry, WriteOutcome, display_name, link_target, write_nav_file};
use crate::error::NavError;
use crate::listing::{Child, DirListing, NavOptions, Walker};

/// Summary of a build run.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Directories visited (including ones that failed).
    pub directories: usize,
    /// Navigation files written (or, in a dry run, that would be written).
    pub created: Vec<PathBuf>,
    /// Directories skipped because a navigation file already exists.
    pub existing: usize,
    /// Directories with nothing to list.
    pub empty: usize,
    /// Per-directory failures; the walk continued past each of these.
    pub failures: Vec<NavError>,
}

impl BuildReport {
    /// True if no directory failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds missing navigation files under a documentation root.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use tocgen_nav::{IndexBuilder, NavOptions};
///
/// let report = IndexBuilder::new(NavOptions::default()).build(Path::new("docs"))?;
/// println!("created {} navigation files", report.created.len());
/// # Ok::<(), tocgen_nav::NavError>(())
/// ```
pub struct IndexBuilder {
    options: NavOptions,
    dry_run: bool,
}

impl IndexBuilder {
    /// Create a builder with the given options.
    #[must_use]
    pub fn new(options: NavOptions) -> Self {
        Self {
            options,
            dry_run: false,
        }
    }

    /// Only report what would be written.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Options in use.
    #[must_use]
    pub fn options(&self) -> &NavOptions {
        &self.options
    }

    /// Build navigation files for every directory under `root` that lacks one.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidRoot`] if `root` is not a readable
    /// directory. Nothing is written in that case. Failures on individual
    /// directories are collected in [`BuildReport::failures`] instead.
    pub fn build(&self, root: &Path) -> Result<BuildReport, NavError> {
        let walker = Walker::new(root, &self.options);
        walker.validate_root()?;

        let mut report = BuildReport::default();
        walker.walk(&mut |listing: Result<DirListing, NavError>| {
            report.directories += 1;
            match listing {
                Ok(listing) => self.process(&listing, &mut report),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping directory");
                    report.failures.push(e);
                }
            }
        });

        tracing::info!(
            created = report.created.len(),
            existing = report.existing,
            failures = report.failures.len(),
            "Navigation build finished"
        );
        Ok(report)
    }

    fn process(&self, listing: &DirListing, report: &mut BuildReport) {
        if listing.has_nav_file {
            tracing::debug!(dir = %listing.dir.display(), "Navigation file exists, skipping");
            report.existing += 1;
            return;
        }
        if listing.children.is_empty() {
            report.empty += 1;
            return;
        }

        let nav_path = listing.nav_path(&self.options);
        let entries = self.entries(&listing.children);

        if self.dry_run {
            report.created.push(nav_path);
            return;
        }

        match write_nav_file(&nav_path, &entries) {
            Ok(WriteOutcome::Created) => {
                tracing::info!(path = %nav_path.display(), entries = entries.len(), "Created navigation file");
                report.created.push(nav_path);
            }
            Ok(WriteOutcome::AlreadyExists) => report.existing += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write navigation file");
                report.failures.push(e);
            }
        }
    }

    /// Navigation entries for a directory's children, in listing order.
    #[must_use]
    pub fn entries(&self, children: &[Child]) -> Vec<NavEntry> {
        children.iter().map(|c| entry_for(c, &self.options)).collect()
    }
}

/// Build the navigation entry for one child.
#[must_use]
pub fn entry_for(child: &Child, options: &NavOptions) -> NavEntry {
    NavEntry::new(
        display_name(&child.name, child.is_dir, &options.extension),
        link_target(&child.name, child.is_dir, &options.filename),
    )
}

/// Build missing navigation files under `root` with the given options.
///
/// Shorthand for `IndexBuilder::new(options.clone()).build(root)`.
///
/// # Errors
///
/// See [`IndexBuilder::build`].
pub fn build_indexes(root: &Path, options: &NavOptions) -> Result<BuildReport, NavError> {
    IndexBuilder::new(options.clone()).build(root)
}
