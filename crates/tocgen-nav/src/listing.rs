//! Directory discovery for navigation files.
//!
//! The walker visits every directory under the documentation root (the root
//! included) in pre-order and hands each one to the caller as a
//! [`DirListing`]: the children that belong in a navigation file plus whether
//! the directory already has one. Nothing is written here.
//!
//! A subdirectory appears in its parent's listing only if it ends up with a
//! navigation file: it already has one, or it has listable children of its
//! own. Empty directories, asset-only directories and directories whose whole
//! content is excluded are left out, so no generated link points at a
//! navigation file that is never written.

use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::NavError;

/// Settings shared by the builder and the checker.
#[derive(Clone, Debug)]
pub struct NavOptions {
    /// Navigation file name (e.g. `toc.yml`).
    pub filename: String,
    /// Asset folder name, excluded from listings and never descended into.
    pub asset_dir: String,
    /// Document extension stripped from display names.
    pub extension: String,
    /// List subdirectories before files.
    pub dirs_first: bool,
    /// Root-relative glob patterns to leave out.
    pub exclude: Vec<Pattern>,
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            filename: "toc.yml".to_owned(),
            asset_dir: "images".to_owned(),
            extension: ".md".to_owned(),
            dirs_first: false,
            exclude: Vec::new(),
        }
    }
}

/// One listable child of a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Child {
    /// File or directory name.
    pub name: String,
    /// True for directories (including symlinks to directories).
    pub is_dir: bool,
    /// True if the entry is a symlink; symlinked directories are listed but not walked.
    pub is_symlink: bool,
}

/// A directory with its listable children.
#[derive(Debug)]
pub(crate) struct DirListing {
    /// Absolute (or root-joined) directory path.
    pub dir: PathBuf,
    /// Children in navigation order.
    pub children: Vec<Child>,
    /// True if the navigation file is present.
    pub has_nav_file: bool,
}

impl DirListing {
    /// Path of this directory's navigation file.
    pub fn nav_path(&self, options: &NavOptions) -> PathBuf {
        self.dir.join(&options.filename)
    }
}

/// A scanned directory and its walked subdirectories.
struct DirNode {
    listing: Result<DirListing, NavError>,
    subdirs: Vec<DirNode>,
}

impl DirNode {
    /// Hand out this directory, then its subdirectories, in pre-order.
    fn emit(self, visit: &mut impl FnMut(Result<DirListing, NavError>)) {
        visit(self.listing);
        for subdir in self.subdirs {
            subdir.emit(visit);
        }
    }
}

/// Pre-order directory walker.
pub(crate) struct Walker<'a> {
    root: &'a Path,
    options: &'a NavOptions,
}

impl<'a> Walker<'a> {
    pub fn new(root: &'a Path, options: &'a NavOptions) -> Self {
        Self { root, options }
    }

    /// Check that the root is a listable directory.
    pub fn validate_root(&self) -> Result<(), NavError> {
        let invalid = |source| NavError::InvalidRoot {
            path: self.root.to_path_buf(),
            source,
        };
        let meta = fs::metadata(self.root).map_err(|e| invalid(Some(e)))?;
        if !meta.is_dir() {
            return Err(invalid(None));
        }
        fs::read_dir(self.root).map_err(|e| invalid(Some(e)))?;
        Ok(())
    }

    /// Walk the tree, calling `visit` once per directory.
    ///
    /// A directory that cannot be listed is reported as `Err` and its
    /// subtree is skipped; siblings are still visited. Such a directory stays
    /// in its parent's listing, since its contents are unknown.
    pub fn walk(&self, visit: &mut impl FnMut(Result<DirListing, NavError>)) {
        let (tree, _) = self.scan(self.root.to_path_buf());
        tree.emit(visit);
    }

    /// List `dir` and its subtree, pruning subdirectories with nothing to list.
    ///
    /// Returns the scanned node and whether `dir` itself will have a
    /// navigation file.
    fn scan(&self, dir: PathBuf) -> (DirNode, bool) {
        tracing::debug!(dir = %dir.display(), "Listing directory");
        let mut listing = match self.list(&dir) {
            Ok(listing) => listing,
            Err(e) => {
                let node = DirNode {
                    listing: Err(e),
                    subdirs: Vec::new(),
                };
                return (node, true);
            }
        };

        let mut subdirs = Vec::new();
        let mut children = Vec::with_capacity(listing.children.len());
        for child in std::mem::take(&mut listing.children) {
            if !child.is_dir {
                children.push(child);
                continue;
            }
            let path = dir.join(&child.name);
            let navigable = if child.is_symlink {
                // Not walked, so only an existing navigation file counts
                path.join(&self.options.filename).is_file()
            } else {
                let (node, navigable) = self.scan(path);
                subdirs.push(node);
                navigable
            };
            if navigable {
                children.push(child);
            } else {
                tracing::debug!(
                    path = %dir.join(&child.name).display(),
                    "Nothing to list, leaving out of parent"
                );
            }
        }
        listing.children = children;

        let navigable = listing.has_nav_file || !listing.children.is_empty();
        let node = DirNode {
            listing: Ok(listing),
            subdirs,
        };
        (node, navigable)
    }

    /// List the immediate children of `dir` that belong in its navigation file.
    pub fn list(&self, dir: &Path) -> Result<DirListing, NavError> {
        let entries = fs::read_dir(dir).map_err(|e| NavError::access(dir, e))?;

        let mut children = Vec::new();
        let mut has_nav_file = false;

        for entry in entries {
            let entry = entry.map_err(|e| NavError::access(dir, e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!(path = %entry.path().display(), "Skipping entry with non-UTF-8 name");
                continue;
            };

            let file_type = entry.file_type().map_err(|e| NavError::access(entry.path(), e))?;
            let is_symlink = file_type.is_symlink();
            let is_dir = if is_symlink {
                // Dangling links are listed as files
                fs::metadata(entry.path()).is_ok_and(|m| m.is_dir())
            } else {
                file_type.is_dir()
            };

            if name == self.options.filename {
                if !is_dir {
                    has_nav_file = true;
                }
                continue;
            }
            if name == self.options.asset_dir || name.starts_with('.') {
                continue;
            }
            if self.is_excluded(&dir.join(&name), is_dir) {
                tracing::debug!(path = %dir.join(&name).display(), "Excluded by pattern");
                continue;
            }

            children.push(Child {
                name,
                is_dir,
                is_symlink,
            });
        }

        sort_children(&mut children, self.options.dirs_first);

        Ok(DirListing {
            dir: dir.to_path_buf(),
            children,
            has_nav_file,
        })
    }

    /// Match a path against the exclude patterns, relative to the root.
    ///
    /// A directory is also excluded when a pattern covers everything inside
    /// it, so `drafts/**` leaves out `drafts` itself.
    fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if self.options.exclude.is_empty() {
            return false;
        }
        let Ok(rel) = path.strip_prefix(self.root) else {
            return false;
        };
        let rel = relative_key(rel);
        let contents = format!("{rel}/");
        self.options
            .exclude
            .iter()
            .any(|p| p.matches(&rel) || (is_dir && p.matches(&contents)))
    }
}

/// Document files found by [`collect_documents`].
#[derive(Debug, Default)]
pub struct DocumentFiles {
    /// Files whose name ends with the document extension, in walk order.
    pub files: Vec<PathBuf>,
    /// Directories that could not be listed.
    pub failures: Vec<NavError>,
}

/// Collect every document under `root`, applying the same exclusions as
/// navigation building (asset folder, hidden entries, exclude patterns).
///
/// # Errors
///
/// Returns [`NavError::InvalidRoot`] if `root` is not a readable directory.
pub fn collect_documents(root: &Path, options: &NavOptions) -> Result<DocumentFiles, NavError> {
    let walker = Walker::new(root, options);
    walker.validate_root()?;

    let mut documents = DocumentFiles::default();
    walker.walk(&mut |listing: Result<DirListing, NavError>| match listing {
        Ok(listing) => {
            documents.files.extend(
                listing
                    .children
                    .iter()
                    .filter(|c| !c.is_dir && has_extension(&c.name, &options.extension))
                    .map(|c| listing.dir.join(&c.name)),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Skipping directory");
            documents.failures.push(e);
        }
    });
    Ok(documents)
}

/// True if `name` ends with `extension`, ASCII case-insensitively.
pub(crate) fn has_extension(name: &str, extension: &str) -> bool {
    name.len() > extension.len()
        && name.is_char_boundary(name.len() - extension.len())
        && name[name.len() - extension.len()..].eq_ignore_ascii_case(extension)
}

/// Root-relative path with `/` separators, used for glob matching.
pub(crate) fn relative_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Sort children case-insensitively, breaking ties by exact name.
fn sort_children(children: &mut [Child], dirs_first: bool) {
    children.sort_by(|a, b| {
        let kind = if dirs_first {
            b.is_dir.cmp(&a.is_dir)
        } else {
            std::cmp::Ordering::Equal
        };
        kind.then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}
