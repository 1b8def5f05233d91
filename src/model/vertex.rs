//! Vertex module for phylogenetic tree representation.

use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a rooted multifurcating phylogenetic tree.
///
/// Whether a vertex is a tip is derived from its children, never stored:
/// a vertex without children is a tip, anything else is internal.
/// A vertex with exactly one child (a "kink") only exists transiently
/// while the tree is being edited.
///
/// # Invariants
/// - `index` is the position of this vertex in the tree arena
/// - `parent` is `None` only for the root and for detached vertices
/// - `children` is ordered; each child lists this vertex as parent
/// - `branch_length` is non-negative (enforced by [BranchLength]); might not be set
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    /// Index of this vertex in the tree arena
    index: VertexIndex,
    /// Index of the parent vertex, if any
    parent: Option<VertexIndex>,
    /// Indices of the child vertices, in Newick order
    children: Vec<VertexIndex>,
    /// Tip label (`taxon@sequence`) or internal tag
    label: Option<String>,
    /// Distance to parent vertex (optional, non-negative if present)
    branch_length: Option<BranchLength>,
}

impl Vertex {
    /// Creates a new vertex without parent and without children.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `label` - Optional label
    /// * `branch_length` - Optional distance to parent vertex
    pub(crate) fn new(
        index: VertexIndex,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex {
            index,
            parent: None,
            children: Vec::new(),
            label,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the label of this vertex, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Sets the label of this vertex.
    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    /// Returns the branch length if set.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns the branch length as plain value, counting a missing length as `0.0`.
    pub fn length(&self) -> f64 {
        self.branch_length.map_or(0.0, |bl| *bl)
    }

    /// Sets the branch length of this vertex.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_tip(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has at least one child.
    pub fn is_internal(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if this vertex has exactly one child.
    pub fn is_kink(&self) -> bool {
        self.children.len() == 1
    }

    /// Returns the children of this vertex (empty for a tip).
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    /// Returns the number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Returns the index of the parent, or `None` for root and detached vertices.
    pub fn parent(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<VertexIndex>) {
        self.parent = parent;
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<VertexIndex> {
        &mut self.children
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(
            length >= 0.0,
            "Branch length must be non-negative, got {}",
            length
        );
        assert!(
            length.is_finite(),
            "Branch length must be finite, got {}",
            length
        );
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is negative or not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        if length >= 0.0 && length.is_finite() {
            Some(BranchLength(length))
        } else {
            None
        }
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
