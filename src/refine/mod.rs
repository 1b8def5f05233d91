//! Tree refinement: tip trimming, monophyly masking and internal branch cutting.
//!
//! The three steps are applied in this order to every inferred homolog tree:
//! 1. [trim] removes outlier tips with very long branches
//! 2. [mask] keeps one representative per taxon in each local clade
//! 3. [cut] splits the tree at long internal branches into subtrees
//!
//! All three edit the tree in place through [Tree::prune] and
//! [Tree::remove_kink], and hand back trees without kinks.
//! Trimming and masking discard trees that drop below [MIN_LEAVES] leaves.

pub mod cut;
pub mod mask;
pub mod trim;

pub use cut::cut;
pub use mask::{UnambiguousCounts, mask, mask_monophyletic_tips, mask_paraphyletic_tips};
pub use trim::trim;

use crate::model::{Tree, VertexIndex};

/// Trees with fewer leaves carry no further signal and are discarded
pub const MIN_LEAVES: usize = 4;

/// Cleans up the attachment point left by [Tree::prune]: a kink is spliced
/// out, a root left with two children is moved to an adjacent internal vertex.
pub(crate) fn resolve_after_prune(tree: &mut Tree, parent: VertexIndex) {
    let vertex = &tree[parent];
    let root_bifurcation = parent == tree.root_index() && vertex.num_children() == 2;
    if vertex.is_kink() || root_bifurcation {
        tree.remove_kink(parent);
    }
}
