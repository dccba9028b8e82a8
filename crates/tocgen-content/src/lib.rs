//! Markdown source maintenance for tocgen.
//!
//! Small, independent fix-ups for a documentation tree:
//!
//! - [`scaffold`]: placeholder pages and directories for planned content
//! - [`rewrite_links`] / [`rewrite_tree`]: literal substitutions on link targets
//! - [`repair_code_blocks`] / [`repair_path`]: split fenced code blocks that
//!   were collapsed onto one line with literal `\n` escapes
//!
//! Tree-wide operations walk documents with [`tocgen_nav::collect_documents`],
//! so they skip the same asset folder, hidden entries, and exclude patterns
//! as navigation building.

mod code_blocks;
mod error;
mod links;
mod markdown;
mod scaffold;

pub use code_blocks::{RepairOptions, RepairReport, Repaired, repair_code_blocks, repair_path};
pub use error::ContentError;
pub use links::{LinkReport, LinkRule, Rewritten, rewrite_links, rewrite_tree};
pub use scaffold::{ScaffoldReport, parse_page_list, placeholder_content, scaffold};
