//! Newick format parser and writer for phylogenetic trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single Newick string into a [Tree]
//! * [`parse_file`] - parses the (first) tree of a file
//! * [`to_newick`] - serializes a [Tree], terminated by `;`
//! * [`write_newick_file`] - writes a [Tree] as one line to a file
//!
//! # Format
//! The Newick format accepted here has the following grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [label] [branch_length]`
//! * `leaf ::= label [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Labels in single quotes may contain any character, `''` escapes `'`
//! * Comments are square brackets, may be nested, and can occur anywhere
//!   between elements; they are discarded
//!
//! Writing is the exact inverse for any tree produced by [`parse_str`]:
//! child order, labels and branch lengths survive a round trip.

mod defs;
pub mod parser;
pub mod writer;

pub use parser::NewickParser;
pub use writer::{to_newick, to_string, write_newick_file};

use crate::model::Tree;
use crate::parser::ByteParser;
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string into a [Tree].
///
/// # Returns
/// * [Tree] - Tree parsed from the string
/// * [ParsingError] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use treefish::newick::parse_str;
///
/// let tree = parse_str("(Fcir@1:0.1,(Farc@1:0.2,Fcor@1:0.3):0.05);")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse(&mut byte_parser)
}

/// Parses the first Newick tree of a file.
///
/// The tree is named after the file name.
///
/// # Errors
/// [ParsingError] if the file cannot be read or holds no valid tree.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let mut byte_parser = ByteParser::from_vec(bytes);
    let mut tree = NewickParser::new().parse(&mut byte_parser)?;

    if let Some(file_name) = path.file_name() {
        tree.set_name(file_name.to_string_lossy().into_owned());
    }
    Ok(tree)
}
