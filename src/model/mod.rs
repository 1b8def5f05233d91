//! Data model for rooted multifurcating phylogenetic trees.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes referenced by [VertexIndex]. Each vertex stores its parent
//! index and the ordered list of its children; whether a vertex is a tip
//! is derived from having no children.
//!
//! # Editing
//! The refinement algorithms only ever edit a tree through the primitives
//! on [Tree]:
//! - [Tree::prune] detaches a clade and returns the former parent
//! - [Tree::remove_kink] splices out a vertex with a single child
//!   (or moves a bifurcating root) and returns the new anchor and root
//! - [Tree::extract_subtree] copies a clade into a tree of its own
//!
//! # Labels
//! Tip labels follow `taxon_code@sequence_id`; see [taxon].

pub mod taxon;
pub mod tree;
pub mod vertex;

pub use tree::{NodeIter, PostOrderIter, PreOrderIter, TraversalOrder, Tree, VertexIndex};
pub use vertex::{BranchLength, Vertex};
