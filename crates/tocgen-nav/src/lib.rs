//! Navigation files for Markdown documentation trees.
//!
//! Static site generators such as DocFX build their sidebar from a
//! `toc.yml` file in each content directory. This crate provides:
//!
//! - [`IndexBuilder`] / [`build_indexes`]: write a navigation file into every
//!   directory that lacks one, listing its pages and subdirectories
//! - [`check_indexes`]: report navigation files that no longer match their
//!   directory, without modifying anything
//! - [`NavEntry`] and the YAML read/write helpers for the file format
//! - [`collect_documents`]: the same walk, yielding document files for
//!   content maintenance tools
//!
//! Existing navigation files are never modified. A hand-curated `toc.yml`
//! stays exactly as written; `check_indexes` is the way to find out that it
//! has drifted.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tocgen_nav::{NavOptions, build_indexes};
//!
//! let report = build_indexes(Path::new("docs"), &NavOptions::default())?;
//! for path in &report.created {
//!     println!("wrote {}", path.display());
//! }
//! # Ok::<(), tocgen_nav::NavError>(())
//! ```

mod builder;
mod check;
mod entry;
mod error;
mod listing;

pub use builder::{BuildReport, IndexBuilder, build_indexes, entry_for};
pub use check::{CheckReport, Issue, check_indexes};
pub use entry::{NavEntry, display_name, link_target, parse_nav, read_nav_file, to_yaml};
pub use error::NavError;
pub use listing::{Child, DocumentFiles, NavOptions, collect_documents};
