//! Treefish refines inferred homolog trees before orthology inference.
//!
//! Homolog trees inferred from clustered sequences contain artifacts:
//! spurious tips on very long branches, runs of same-taxon tips from
//! isoforms or assembly redundancy, and long internal branches joining
//! unrelated clades. This crate removes them in three steps on a rooted
//! multifurcating tree read from Newick:
//! - Trim: [refine::trim] removes tips whose branch is very long, either
//!   absolutely or in contrast to a peer below the same parent.
//! - Mask: [refine::mask] keeps one tip per same-taxon sister pair, choosing
//!   the one whose aligned sequence has more unambiguous characters.
//! - Cut: [refine::cut] splits the tree at long internal branches and keeps
//!   the pieces with enough taxa.
//!
//! Tip labels have the form `taxon@sequence`; the part before `@` is the
//! taxon code.
//!
//! Further provided:
//! - [model]: arena [Tree] with traversal iterators and the structural
//!   primitives the steps are built from (prune, kink removal, extraction).
//! - [newick]: Newick parser and writer, with quoted labels, nested
//!   comments and internal labels.
//! - [io]: alignment FASTA to unambiguous counts, ignore lists and FASTA
//!   extraction for the leaves of a tree.
//! - [pipeline]: the steps as file stages (`.tt`, `.mm`, `_<n>.subtree`)
//!   and their in-memory composition.
//!
//! # Usage
//!
//! ```
//! use treefish::config::RefineConfig;
//! use treefish::refine::UnambiguousCounts;
//!
//! let tree = treefish::parse_newick_str(
//!     "(((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):0.6,(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1):0.6):5.0,I@1:0.1,J@1:0.1);",
//! )?;
//! let config = RefineConfig::default().with_masking(false, false);
//!
//! let subtrees = treefish::pipeline::refine_tree(tree, &config, &UnambiguousCounts::new())?;
//! assert_eq!(subtrees.len(), 2);
//! assert!(subtrees.iter().all(|t| t.num_leaves() == 4));
//! # Ok::<(), treefish::RefineError>(())
//! ```

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod newick;
pub mod parser;
pub mod pipeline;
pub mod refine;

pub use crate::config::RefineConfig;
pub use crate::error::RefineError;
pub use crate::model::Tree;

use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string into a [Tree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Parse the Newick tree in a file into a [Tree] named after the file.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    newick::parse_file(path)
}
