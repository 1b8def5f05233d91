//! Monophyly and paraphyly masking.
//!
//! Isoforms and assembly redundancy leave several tips of the same taxon
//! next to each other. Masking keeps, per pair of such tips, the one whose
//! aligned sequence has more unambiguous characters and prunes the other,
//! until no pair is left.
//!
//! * Monophyletic tips are same-taxon sister tips (same parent).
//! * Paraphyletic tips are one level further out: a tip and a same-taxon
//!   tip child of a sister of its parent.

use crate::error::RefineError;
use crate::model::taxon::taxon_code;
use crate::model::{TraversalOrder, Tree, VertexIndex};
use crate::refine::{MIN_LEAVES, resolve_after_prune};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Alignment characters that carry no information: gaps and ambiguity codes
pub const UNINFORMATIVE_CHARS: &[u8] = b"-Xx?*";

// =#========================================================================#=
// UNAMBIGUOUS COUNTS
// =#========================================================================#=
/// Number of unambiguous characters of each tip's aligned sequence,
/// keyed by full tip label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnambiguousCounts {
    counts: HashMap<String, usize>,
}

impl UnambiguousCounts {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes counts from `(label, aligned sequence)` pairs.
    ///
    /// # Example
    /// ```
    /// use treefish::refine::UnambiguousCounts;
    ///
    /// let counts = UnambiguousCounts::from_sequences([("Atha@1", "MK-X?*L")]);
    /// assert_eq!(counts.get("Atha@1").unwrap(), 3);
    /// ```
    pub fn from_sequences<I, L, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = (L, S)>,
        L: Into<String>,
        S: AsRef<[u8]>,
    {
        sequences
            .into_iter()
            .map(|(label, seq)| (label.into(), count_unambiguous(seq.as_ref())))
            .collect()
    }

    /// Sets the count of one label.
    pub fn insert<L: Into<String>>(&mut self, label: L, count: usize) {
        self.counts.insert(label.into(), count);
    }

    /// Returns the count for a tip label.
    ///
    /// # Errors
    /// [RefineError::MissingSequence] if the label is unknown.
    pub fn get(&self, label: &str) -> Result<usize, RefineError> {
        self.counts
            .get(label)
            .copied()
            .ok_or_else(|| RefineError::MissingSequence {
                label: label.to_string(),
            })
    }

    /// Returns whether a count exists for the label.
    pub fn contains(&self, label: &str) -> bool {
        self.counts.contains_key(label)
    }

    /// Number of labels with a count.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether there are no counts at all.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(String, usize)> for UnambiguousCounts {
    fn from_iter<T: IntoIterator<Item = (String, usize)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Counts characters of an aligned sequence that are neither gaps nor ambiguous.
pub fn count_unambiguous(sequence: &[u8]) -> usize {
    sequence
        .iter()
        .filter(|&&b| !UNINFORMATIVE_CHARS.contains(&b))
        .count()
}

// =#========================================================================#=
// MASKING
// =#========================================================================#=
/// Masks monophyletic and (optionally) paraphyletic same-taxon tips.
///
/// Monophyletic masking runs to its fixpoint first, then paraphyletic
/// masking. Tips whose taxon code is in `ignore` are never masked.
/// Every tip label must have an entry in `counts`; this is checked before
/// the tree is touched.
///
/// # Returns
/// * `Ok(Some(tree))` - The masked tree
/// * `Ok(None)` - Fewer than [MIN_LEAVES] leaves remained
/// * `Err(RefineError::MissingSequence)` - A tip has no count
pub fn mask(
    mut tree: Tree,
    counts: &UnambiguousCounts,
    ignore: &HashSet<String>,
    paraphyly: bool,
) -> Result<Option<Tree>, RefineError> {
    for label in tree.front_labels(tree.root_index()) {
        counts.get(label)?;
    }

    let mut masked = mask_monophyletic_tips(&mut tree, counts, ignore)?;
    if paraphyly && tree.num_leaves() >= MIN_LEAVES {
        masked += mask_paraphyletic_tips(&mut tree, counts, ignore)?;
    }
    debug!("masked {} tip(s)", masked);

    if tree.num_leaves() < MIN_LEAVES {
        debug!("fewer than {} tips left, discarding tree", MIN_LEAVES);
        return Ok(None);
    }
    debug_assert!(tree.is_kink_free());
    Ok(Some(tree))
}

/// Prunes same-taxon sister tips until none are left,
/// returning the number of tips pruned.
///
/// Stops early once fewer than [MIN_LEAVES] leaves remain.
/// Kinks created by pruning are always resolved.
pub fn mask_monophyletic_tips(
    tree: &mut Tree,
    counts: &UnambiguousCounts,
    ignore: &HashSet<String>,
) -> Result<usize, RefineError> {
    mask_to_fixpoint(tree, counts, ignore, |tree, tip| tree.sisters(tip))
}

/// Prunes same-taxon tips nested one level apart until none are left,
/// returning the number of tips pruned.
///
/// Tips directly below the root have no paraphyletic partners.
pub fn mask_paraphyletic_tips(
    tree: &mut Tree,
    counts: &UnambiguousCounts,
    ignore: &HashSet<String>,
) -> Result<usize, RefineError> {
    mask_to_fixpoint(tree, counts, ignore, |tree, tip| match tree[tip].parent() {
        Some(parent) if parent != tree.root_index() => tree.sisters(parent),
        _ => Vec::new(),
    })
}

fn mask_to_fixpoint<F>(
    tree: &mut Tree,
    counts: &UnambiguousCounts,
    ignore: &HashSet<String>,
    partners: F,
) -> Result<usize, RefineError>
where
    F: Fn(&Tree, VertexIndex) -> Vec<VertexIndex>,
{
    let mut masked = 0;

    while let Some(tip) = find_redundant_tip(tree, counts, ignore, &partners)? {
        debug!("masking tip {}", tree[tip].label().unwrap_or("?"));
        if let Some(parent) = tree.prune(tip) {
            resolve_after_prune(tree, parent);
        }
        masked += 1;

        if tree.num_leaves() < MIN_LEAVES {
            break;
        }
    }

    Ok(masked)
}

/// Finds the first same-taxon pair in pre-order and returns the tip to drop.
///
/// The tip with more unambiguous characters is kept; on a tie the tip
/// visited first is kept.
fn find_redundant_tip<F>(
    tree: &Tree,
    counts: &UnambiguousCounts,
    ignore: &HashSet<String>,
    partners: &F,
) -> Result<Option<VertexIndex>, RefineError>
where
    F: Fn(&Tree, VertexIndex) -> Vec<VertexIndex>,
{
    for index in tree.node_indices(TraversalOrder::PreOrder) {
        let vertex = &tree[index];
        if !vertex.is_tip() {
            continue;
        }
        let Some(label) = vertex.label() else {
            continue;
        };
        let taxon = taxon_code(label);
        if ignore.contains(taxon) {
            continue;
        }

        for partner in partners(tree, index) {
            let partner_vertex = &tree[partner];
            if !partner_vertex.is_tip() {
                continue;
            }
            let Some(partner_label) = partner_vertex.label() else {
                continue;
            };
            if taxon_code(partner_label) != taxon {
                continue;
            }

            let drop = if counts.get(label)? >= counts.get(partner_label)? {
                partner
            } else {
                index
            };
            return Ok(Some(drop));
        }
    }

    Ok(None)
}
