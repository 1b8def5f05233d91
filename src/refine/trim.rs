//! Tip trimming.
//!
//! Walks the tree in post-order and keeps, for every vertex, a stepwise
//! averaged length of the branches below it. A tip is an outlier if its
//! branch exceeds the absolute cutoff, or if it exceeds the relative cutoff
//! and is more than ten times as long as a peer below the same parent.
//! Every removal restarts the walk, since the lengths computed so far are stale.

use crate::model::{TraversalOrder, Tree, VertexIndex};
use crate::refine::{MIN_LEAVES, resolve_after_prune};
use log::debug;

/// Factor by which an outlier tip must exceed its peer
const CONTRAST_RATIO: f64 = 10.0;

/// Result of one post-order walk.
enum Pass {
    /// Nothing removed, tree is stable
    Unchanged,
    /// Topology changed, walk again
    Changed,
    /// Fewer than [MIN_LEAVES] leaves would remain
    Discarded,
}

/// Removes outlier tips until the tree is stable.
///
/// # Arguments
/// * `tree` - Tree to trim
/// * `relative_cutoff` - Tips longer than this and >10x their peer are removed
/// * `absolute_cutoff` - Tips longer than this are removed
///
/// # Returns
/// The trimmed tree, or `None` if it has (or would get) fewer than
/// [MIN_LEAVES] leaves.
///
/// # Example
/// ```
/// use treefish::refine::trim;
///
/// let tree = treefish::parse_newick_str(
///     "((A@1:0.1,B@1:0.2):0.1,(C@1:0.1,D@1:0.1):0.1,(E@1:0.2,F@1:3.0):0.1);",
/// ).unwrap();
/// let trimmed = trim(tree, 1.0, 1.5).unwrap();
/// assert_eq!(trimmed.num_leaves(), 5);
/// ```
pub fn trim(mut tree: Tree, relative_cutoff: f64, absolute_cutoff: f64) -> Option<Tree> {
    if tree.root().is_kink() {
        tree.remove_kink(tree.root_index());
    }

    loop {
        match trim_pass(&mut tree, relative_cutoff, absolute_cutoff) {
            Pass::Unchanged => break,
            Pass::Changed => continue,
            Pass::Discarded => {
                debug!("fewer than {} tips left, discarding tree", MIN_LEAVES);
                return None;
            }
        }
    }

    if tree.num_leaves() < MIN_LEAVES {
        return None;
    }
    debug_assert!(tree.is_kink_free());
    Some(tree)
}

fn trim_pass(tree: &mut Tree, relative_cutoff: f64, absolute_cutoff: f64) -> Pass {
    // Stepwise averaged length below each vertex
    let mut lengths = vec![0.0; tree.arena_len()];

    for index in tree.node_indices(TraversalOrder::PostOrder) {
        let children = tree[index].children().to_vec();
        let own_length = tree[index].length();

        match children.len() {
            0 => {
                lengths[index] = own_length;
                if own_length > absolute_cutoff {
                    return remove_tip(tree, index);
                }
            }
            1 => {
                tree.remove_kink(index);
                return Pass::Changed;
            }
            2 => {
                let (first, second) = (children[0], children[1]);
                lengths[index] = (lengths[first] + lengths[second]) / 2.0 + own_length;
                if let Some(outlier) =
                    contrast_outlier(tree, &lengths, first, second, relative_cutoff)
                {
                    return remove_tip(tree, outlier);
                }
            }
            num_children => {
                lengths[index] =
                    children.iter().map(|&c| lengths[c]).sum::<f64>() / num_children as f64;
                for (i, &first) in children.iter().enumerate() {
                    for &second in &children[i + 1..] {
                        if let Some(outlier) =
                            contrast_outlier(tree, &lengths, first, second, relative_cutoff)
                        {
                            return remove_tip(tree, outlier);
                        }
                    }
                }
            }
        }
    }

    Pass::Unchanged
}

/// Returns the tip among `a` and `b` that is long and >10x longer than the other.
fn contrast_outlier(
    tree: &Tree,
    lengths: &[f64],
    a: VertexIndex,
    b: VertexIndex,
    relative_cutoff: f64,
) -> Option<VertexIndex> {
    let (length_a, length_b) = (lengths[a], lengths[b]);
    if tree[a].is_tip()
        && length_a > relative_cutoff
        && (length_b == 0.0 || length_a / length_b > CONTRAST_RATIO)
    {
        return Some(a);
    }
    if tree[b].is_tip()
        && length_b > relative_cutoff
        && (length_a == 0.0 || length_b / length_a > CONTRAST_RATIO)
    {
        return Some(b);
    }
    None
}

fn remove_tip(tree: &mut Tree, tip: VertexIndex) -> Pass {
    debug!(
        "trimming tip {} (branch length {})",
        tree[tip].label().unwrap_or("?"),
        tree[tip].length()
    );
    let Some(parent) = tree.prune(tip) else {
        return Pass::Discarded;
    };
    if tree.num_leaves() < MIN_LEAVES {
        return Pass::Discarded;
    }
    resolve_after_prune(tree, parent);
    Pass::Changed
}
