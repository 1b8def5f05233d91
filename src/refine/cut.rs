//! Internal branch cutting.
//!
//! Long internal branches usually separate unrelated duplication clades or
//! contaminants. The cutter repeatedly splits off the clade below the first
//! internal branch (in pre-order) longer than the cutoff, until no such
//! branch is left, and returns all pieces with enough taxa.

use crate::model::{TraversalOrder, Tree, VertexIndex};
use crate::refine::resolve_after_prune;
use log::debug;
use std::cmp::Reverse;

/// Splits a tree at internal branches longer than `cutoff`.
///
/// For a long-branched vertex with two internal children whose branch
/// lengths also sum above `cutoff`, each child clade is kept on its own;
/// otherwise the clade of the vertex is kept whole. What remains of the
/// tree after the last cut is kept as well.
///
/// # Arguments
/// * `tree` - Tree to cut
/// * `cutoff` - Internal branches longer than this are cut
/// * `min_taxa` - Pieces with fewer distinct taxon codes are dropped
///
/// # Returns
/// The pieces with at least `min_taxa` taxa, ordered by descending number
/// of taxa; a root left with one or two children is moved to an adjacent
/// internal vertex. If no branch was cut, the tree itself is the only
/// candidate piece.
pub fn cut(mut tree: Tree, cutoff: f64, min_taxa: usize) -> Vec<Tree> {
    let mut pieces = Vec::new();
    let mut cuts = 0;

    while let Some(index) = next_long_branch(&mut tree, cutoff) {
        cuts += 1;
        split_off(&tree, index, cutoff, min_taxa, &mut pieces);

        let Some(parent) = tree.prune(index) else {
            break;
        };
        resolve_after_prune(&mut tree, parent);
        // Two tips left cannot be cut any further
        if tree.num_leaves() <= 2 {
            break;
        }
    }

    debug!("{} internal branch(es) longer than {} cut", cuts, cutoff);

    let residual = tree.extract_subtree(tree.root_index());
    pieces.push(residual);

    let mut pieces: Vec<Tree> = pieces
        .into_iter()
        .filter(|piece| piece.count_taxa(piece.root_index()) >= min_taxa)
        .map(finish_piece)
        .collect();
    pieces.sort_by_key(|piece| Reverse(piece.count_taxa(piece.root_index())));
    pieces
}

/// Finds the first non-root internal vertex in pre-order whose branch is
/// longer than `cutoff`, splicing out kinks met on the way.
fn next_long_branch(tree: &mut Tree, cutoff: f64) -> Option<VertexIndex> {
    'walk: loop {
        for index in tree.node_indices(TraversalOrder::PreOrder) {
            if index == tree.root_index() || tree[index].is_tip() {
                continue;
            }
            if tree[index].is_kink() {
                tree.remove_kink(index);
                continue 'walk;
            }
            if tree[index].length() > cutoff {
                return Some(index);
            }
        }
        return None;
    }
}

/// Copies the clade(s) split off at `index` into `pieces`.
fn split_off(
    tree: &Tree,
    index: VertexIndex,
    cutoff: f64,
    min_taxa: usize,
    pieces: &mut Vec<Tree>,
) {
    let children = tree[index].children();
    debug!(
        "cutting branch of length {} above {} tips",
        tree[index].length(),
        tree.leaves(index).len()
    );

    let split_children = children.len() == 2
        && children.iter().all(|&c| tree[c].is_internal())
        && tree[children[0]].length() + tree[children[1]].length() > cutoff;

    if split_children {
        for &child in children {
            if tree.count_taxa(child) >= min_taxa {
                pieces.push(tree.extract_subtree(child));
            }
        }
    } else {
        pieces.push(tree.extract_subtree(index));
    }
}

/// A root with one or two children left behind by cutting is collapsed.
fn finish_piece(mut piece: Tree) -> Tree {
    if piece.root().is_kink() {
        piece.remove_kink(piece.root_index());
    }
    if piece.root().num_children() == 2 {
        piece.remove_kink(piece.root_index());
    }
    debug_assert!(piece.is_kink_free());
    piece
}
