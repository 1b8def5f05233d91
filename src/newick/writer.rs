//! Newick format writing for [Tree].

use crate::model::{Tree, Vertex, VertexIndex};
use crate::newick::defs::{BRANCH_LENGTH_CHARS, BUFFER_CHARS};
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes a tree to a file as a single Newick line.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
pub fn write_newick_file<P: AsRef<Path>>(path: P, tree: &Tree) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(to_newick(tree).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Internal vertices are written as `(child1,child2,...)label:length`,
/// tips as `label:length`; label and length are omitted when absent.
/// Labels with special characters are quoted, see
/// [escape_label](crate::parser::utils::escape_label).
///
/// # Example
/// ```
/// let tree = treefish::parse_newick_str("((A:1,B:2)x:0.5,'C d':3);").unwrap();
/// assert_eq!(treefish::newick::to_newick(&tree), "((A:1,B:2)x:0.5,'C d':3);");
/// ```
pub fn to_newick(tree: &Tree) -> String {
    let mut newick = String::with_capacity(estimate_newick_len(tree));
    build_newick(tree, &mut newick, tree.root_index());
    newick.push(';');
    newick
}

/// Returns the Newick representation of the clade at `index`, without `;`.
pub fn to_string(tree: &Tree, index: VertexIndex) -> String {
    let mut newick = String::new();
    build_newick(tree, &mut newick, index);
    newick
}

// Recursive helper for building the Newick string
fn build_newick(tree: &Tree, newick: &mut String, index: VertexIndex) {
    let vertex = &tree[index];

    if vertex.is_internal() {
        newick.push('(');
        for (i, &child) in vertex.children().iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(tree, newick, child);
        }
        newick.push(')');
    }

    if let Some(label) = vertex.label() {
        newick.push_str(&escape_label(label));
    }
    build_newick_branch_length(newick, vertex);
}

// Helper for adding branch lengths
fn build_newick_branch_length(newick: &mut String, vertex: &Vertex) {
    if let Some(branch_length) = vertex.branch_length() {
        newick.push(':');
        newick.push_str(&branch_length.to_string());
    }
}

/// Estimates the length of a Newick string for a given tree,
/// used to pre-allocate string capacity.
fn estimate_newick_len(tree: &Tree) -> usize {
    tree.pre_order_iter()
        .map(|v| {
            let label_len = v.label().map_or(0, str::len);
            let structure_len = if v.is_internal() { 2 + v.num_children() } else { 0 };
            label_len + structure_len + BRANCH_LENGTH_CHARS
        })
        .sum::<usize>()
        + BUFFER_CHARS
}
