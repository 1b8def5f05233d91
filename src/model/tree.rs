//! Provides the rooted multifurcating tree used throughout the refinement.
//!
//! Provides core data structures for representing phylogenetic trees:
//! * [Tree] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * [PreOrderIter] and [PostOrderIter] for traversal
//!
//! Besides construction and traversal, [Tree] offers the structural
//! primitives the refinement algorithms are built from:
//! [prune](Tree::prune), [remove_kink](Tree::remove_kink),
//! [leaves](Tree::leaves), [front_labels](Tree::front_labels),
//! [front_names](Tree::front_names) and
//! [extract_subtree](Tree::extract_subtree).

use crate::model::taxon::taxon_code;
use crate::model::vertex::{BranchLength, Vertex};
use crate::newick;
use std::collections::HashSet;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted multifurcating phylogenetic tree represented using the arena
/// pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Each vertex stores the index of its parent and the
/// ordered indices of its children, so editing the topology only rewrites
/// indices and never moves vertices.
///
/// # Structure
/// - Vertices that get pruned or spliced out stay in the arena, but are
///   no longer reachable from the root. All counts and traversals only
///   consider vertices reachable from the root.
/// - Index of root is maintained; operations that move the root
///   (e.g. [remove_kink](Tree::remove_kink) on the root) update it.
/// - No assumption on order of indices is maintained.
/// - Branch lengths are optional, but if provided must be non-negative.
///
/// # Construction
/// Trees are usually obtained from [newick::parse_str].
/// For manual construction, add vertices with [`Tree::add_vertex()`],
/// connect them with [`Tree::attach_child()`] and mark the root with
/// [`Tree::set_root()`]. Test validity with [`Tree::is_valid()`].
#[derive(Debug, Clone)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,

    /// Name of tree; optional, e.g. derived from the file it was read from
    name: Option<String>,
}

/// Order in which [Tree::iter_nodes] visits vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    /// Parents before children
    PreOrder,
    /// Children before parents
    PostOrder,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new empty tree with room for `num_vertices` vertices.
    pub fn with_capacity(num_vertices: usize) -> Self {
        Tree {
            vertices: Vec::with_capacity(num_vertices),
            root_index: NO_ROOT_SET_INDEX,
            name: None,
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds an unattached vertex to the arena and returns its index.
    ///
    /// # Arguments
    /// * `label` - Optional label (tips: `taxon@sequence`)
    /// * `branch_length` - Optional length of incoming branch
    pub fn add_vertex(
        &mut self,
        label: Option<String>,
        branch_length: Option<BranchLength>,
    ) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new(index, label, branch_length));
        index
    }

    /// Appends `child` as last child of `parent`.
    ///
    /// # Panics
    /// Panics if `child` already has a parent.
    pub fn attach_child(&mut self, parent: VertexIndex, child: VertexIndex) {
        assert!(
            !self[child].has_parent(),
            "Vertex {} is already attached to a parent",
            child
        );
        self[parent].children_mut().push(child);
        self[child].set_parent(Some(parent));
    }

    /// Marks the given vertex as root of this tree.
    pub fn set_root(&mut self, index: VertexIndex) {
        self.root_index = index;
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set a name for this tree.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns the number of leaves reachable from the root.
    pub fn num_leaves(&self) -> usize {
        self.pre_order_iter().filter(|v| v.is_tip()).count()
    }

    /// Returns the number of internal vertices reachable from the root.
    pub fn num_internal(&self) -> usize {
        self.pre_order_iter().filter(|v| v.is_internal()).count()
    }

    /// Returns the number of vertices reachable from the root.
    pub fn num_vertices(&self) -> usize {
        self.pre_order_iter().count()
    }

    /// Returns the number of vertices in the arena, including detached ones.
    pub fn arena_len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the sum of all branch lengths reachable from the root.
    pub fn total_branch_length(&self) -> f64 {
        self.pre_order_iter().map(|v| v.length()).sum()
    }

    /// Returns the Newick representation of this tree, terminated by `;`.
    pub fn to_newick(&self) -> String {
        newick::to_newick(self)
    }

    /// Returns `true` if no vertex reachable from the root has exactly one child.
    pub fn is_kink_free(&self) -> bool {
        self.pre_order_iter().all(|v| !v.is_kink())
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, in bounds and the root has no parent
    /// - All vertex indices match their position in the arena
    /// - All children reachable from the root point back to their parent
    /// - No vertex is reachable twice
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.vertices.len() {
            return false;
        }
        if self.root().has_parent() {
            return false;
        }

        let mut seen = vec![false; self.vertices.len()];
        let mut stack = vec![self.root_index];
        while let Some(index) = stack.pop() {
            if seen[index] {
                return false;
            }
            seen[index] = true;

            let vertex = &self.vertices[index];
            if vertex.index() != index {
                return false;
            }
            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
                stack.push(child);
            }
        }

        true
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// =$========================================================================$=
// QUERIES
// =$========================================================================$=
impl Tree {
    /// Returns the indices of all tips in the subtree rooted at `index`,
    /// in pre-order.
    pub fn leaves(&self, index: VertexIndex) -> Vec<VertexIndex> {
        self.pre_order_from(index)
            .filter(|v| v.is_tip())
            .map(|v| v.index())
            .collect()
    }

    /// Returns the labels of all tips below `index`.
    ///
    /// Unlabeled tips are skipped.
    pub fn front_labels(&self, index: VertexIndex) -> Vec<&str> {
        self.pre_order_from(index)
            .filter(|v| v.is_tip())
            .filter_map(|v| v.label())
            .collect()
    }

    /// Returns the taxon codes (label part before `@`) of all tips below `index`.
    pub fn front_names(&self, index: VertexIndex) -> Vec<&str> {
        self.front_labels(index)
            .into_iter()
            .map(taxon_code)
            .collect()
    }

    /// Returns the number of distinct taxon codes among the tips below `index`.
    pub fn count_taxa(&self, index: VertexIndex) -> usize {
        self.front_names(index)
            .into_iter()
            .collect::<HashSet<_>>()
            .len()
    }

    /// Returns the other children of the parent of `index`,
    /// or an empty list for the root and detached vertices.
    pub fn sisters(&self, index: VertexIndex) -> Vec<VertexIndex> {
        match self[index].parent() {
            Some(parent) => self[parent]
                .children()
                .iter()
                .copied()
                .filter(|&c| c != index)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns `true` if any tip label of this tree is contained in `labels`.
    pub fn contains_any_label(&self, labels: &HashSet<String>) -> bool {
        self.front_labels(self.root_index)
            .into_iter()
            .any(|l| labels.contains(l))
    }
}

// =$========================================================================$=
// STRUCTURAL EDITS
// =$========================================================================$=
impl Tree {
    /// Detaches the subtree rooted at `index` from its parent.
    ///
    /// The detached vertices stay in the arena but are no longer reachable
    /// from the root; use [extract_subtree](Tree::extract_subtree) first if
    /// the clade is needed as tree of its own.
    ///
    /// # Returns
    /// The former parent (now possibly a kink), or `None` if `index` had no
    /// parent, in which case nothing changes.
    pub fn prune(&mut self, index: VertexIndex) -> Option<VertexIndex> {
        let parent = self[index].parent()?;
        self[parent].children_mut().retain(|&c| c != index);
        self[index].set_parent(None);
        Some(parent)
    }

    /// Splices out the kink at `index`.
    ///
    /// * Non-root vertex with one child: the child takes the kink's place
    ///   in the grandparent's children, with the two branch lengths summed.
    /// * Root with one child: the child becomes the new root.
    /// * Root with two children: the root is moved to the first internal
    ///   child, the other child is reattached there with the two edge
    ///   lengths summed. Nothing happens if both children are tips.
    ///
    /// Any other vertex is left untouched.
    ///
    /// # Returns
    /// The (possibly new) vertex now in the kink's place and the
    /// (possibly new) root index.
    pub fn remove_kink(&mut self, index: VertexIndex) -> (VertexIndex, VertexIndex) {
        if index == self.root_index {
            return match self[index].num_children() {
                1 => self.remove_root_kink(),
                2 => self.collapse_root_bifurcation(),
                _ => (index, index),
            };
        }

        let Some(parent) = self[index].parent() else {
            return (index, self.root_index);
        };
        if !self[index].is_kink() {
            return (index, self.root_index);
        }

        let child = self[index].children()[0];
        let length = sum_lengths(self[index].branch_length(), self[child].branch_length());

        if let Some(position) = self[parent].children().iter().position(|&c| c == index) {
            self[parent].children_mut()[position] = child;
        }
        self[child].set_parent(Some(parent));
        self[child].set_branch_length(length);

        self[index].children_mut().clear();
        self[index].set_parent(None);

        (child, self.root_index)
    }

    /// Root with a single child: the child becomes root.
    fn remove_root_kink(&mut self) -> (VertexIndex, VertexIndex) {
        let old_root = self.root_index;
        let child = self[old_root].children()[0];
        let root_length = self[old_root].branch_length();

        self[old_root].children_mut().clear();
        self[child].set_parent(None);
        self[child].set_branch_length(root_length);
        self.root_index = child;

        (child, child)
    }

    /// Root with two children: move root to the first internal child.
    fn collapse_root_bifurcation(&mut self) -> (VertexIndex, VertexIndex) {
        let old_root = self.root_index;
        let (first, second) = (self[old_root].children()[0], self[old_root].children()[1]);
        let (new_root, other) = if self[first].is_internal() {
            (first, second)
        } else if self[second].is_internal() {
            (second, first)
        } else {
            return (old_root, old_root);
        };

        let length = sum_lengths(self[new_root].branch_length(), self[other].branch_length());
        let root_length = self[old_root].branch_length();

        self[old_root].children_mut().clear();
        self[other].set_parent(None);
        self[new_root].set_parent(None);

        self[other].set_branch_length(length);
        self.attach_child(new_root, other);
        self[new_root].set_branch_length(root_length);
        self.root_index = new_root;

        (new_root, new_root)
    }

    /// Copies the clade rooted at `index` into a new, independent tree.
    ///
    /// The copy keeps labels, branch lengths and child order; its root has
    /// no incoming branch length. The tree name is carried over.
    pub fn extract_subtree(&self, index: VertexIndex) -> Tree {
        let mut subtree = Tree::with_capacity(2 * self.leaves(index).len());
        subtree.name = self.name.clone();

        let mut stack: Vec<(VertexIndex, Option<VertexIndex>)> = vec![(index, None)];
        while let Some((old_index, new_parent)) = stack.pop() {
            let vertex = &self[old_index];
            let branch_length = new_parent.and(vertex.branch_length());
            let new_index = subtree.add_vertex(vertex.label().map(str::to_string), branch_length);

            match new_parent {
                Some(parent) => subtree.attach_child(parent, new_index),
                None => subtree.set_root(new_index),
            }

            // Reversed, so first child gets popped (and attached) first
            for &child in vertex.children().iter().rev() {
                stack.push((child, Some(new_index)));
            }
        }

        subtree
    }
}

/// Sums two optional branch lengths; `None` only if both are missing.
fn sum_lengths(a: Option<BranchLength>, b: Option<BranchLength>) -> Option<BranchLength> {
    match (a, b) {
        (None, None) => None,
        _ => Some(BranchLength::new(
            a.map_or(0.0, |bl| *bl) + b.map_or(0.0, |bl| *bl),
        )),
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl Tree {
    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for aggregating data from leaves upward, e.g. the
    /// stepwise averaged lengths used for tip trimming.
    ///
    /// # Example
    /// ```
    /// let tree = treefish::parse_newick_str("((A:1,B:1):1,C:2);").unwrap();
    /// let labels: Vec<_> = tree.post_order_iter().map(|v| v.label()).collect();
    /// assert_eq!(labels, vec![Some("A"), Some("B"), None, Some("C"), None]);
    /// ```
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self, self.root_index)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// # Example
    /// ```
    /// let tree = treefish::parse_newick_str("((A:1,B:1):1,C:2);").unwrap();
    /// let labels: Vec<_> = tree.pre_order_iter().map(|v| v.label()).collect();
    /// assert_eq!(labels, vec![None, None, Some("A"), Some("B"), Some("C")]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self, self.root_index)
    }

    /// Post-order iterator over the subtree rooted at `start`.
    pub fn post_order_from(&self, start: VertexIndex) -> PostOrderIter<'_> {
        PostOrderIter::new(self, start)
    }

    /// Pre-order iterator over the subtree rooted at `start`.
    pub fn pre_order_from(&self, start: VertexIndex) -> PreOrderIter<'_> {
        PreOrderIter::new(self, start)
    }

    /// Iterates over the subtree rooted at `start` in the given order.
    pub fn iter_nodes(&self, start: VertexIndex, order: TraversalOrder) -> NodeIter<'_> {
        match order {
            TraversalOrder::PreOrder => NodeIter::Pre(self.pre_order_from(start)),
            TraversalOrder::PostOrder => NodeIter::Post(self.post_order_from(start)),
        }
    }

    /// Snapshot of the vertex indices in the given order, starting at the root.
    ///
    /// Algorithms that edit the tree walk such a snapshot and restart after
    /// every edit, since the topology it reflects is then stale.
    pub(crate) fn node_indices(&self, order: TraversalOrder) -> Vec<VertexIndex> {
        self.iter_nodes(self.root_index, order)
            .map(|v| v.index())
            .collect()
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree, start: VertexIndex) -> Self {
        let mut stack = Vec::new();
        if start < tree.vertices.len() {
            stack.push((start, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_tip() {
                return Some(vertex);
            } else {
                self.stack.push((index, true));

                // Push children last-first, so first child is processed first
                for &child in vertex.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree, start: VertexIndex) -> Self {
        let mut stack = Vec::new();
        if start < tree.vertices.len() {
            stack.push(start);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        for &child in vertex.children().iter().rev() {
            self.stack.push(child);
        }

        Some(vertex)
    }
}

/// Either of the two traversal iterators, see [Tree::iter_nodes].
pub enum NodeIter<'a> {
    /// Pre-order traversal
    Pre(PreOrderIter<'a>),
    /// Post-order traversal
    Post(PostOrderIter<'a>),
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            NodeIter::Pre(iter) => iter.next(),
            NodeIter::Post(iter) => iter.next(),
        }
    }
}
