//! Refinement settings.

use std::collections::HashSet;

/// Default cutoff above which a tip is trimmed unconditionally
pub const DEFAULT_ABSOLUTE_CUTOFF: f64 = 1.5;

/// Default cutoff above which a tip >10x its sister is trimmed
pub const DEFAULT_RELATIVE_CUTOFF: f64 = 1.0;

/// Default cutoff above which an internal branch is cut
pub const DEFAULT_INTERNAL_CUTOFF: f64 = 1.0;

/// Default minimum number of taxa for a subtree to be kept
pub const DEFAULT_MIN_TAXA: usize = 4;

/// Configuration of one refinement round (trim, mask, cut).
///
/// # Examples
///
/// ```rust
/// use treefish::config::RefineConfig;
///
/// let config = RefineConfig::default()
///     .with_internal_cutoff(0.8)
///     .with_ignored_taxa(["Atha", "Osat"]);
/// assert_eq!(config.min_taxa, 4);
/// assert!(config.ignore.contains("Atha"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RefineConfig {
    /// Tips longer than this and >10x their sister are trimmed.
    ///
    /// **Default**: `1.0`
    pub relative_cutoff: f64,

    /// Tips longer than this are trimmed.
    ///
    /// **Default**: `1.5`
    pub absolute_cutoff: f64,

    /// Internal branches longer than this are cut.
    ///
    /// **Default**: `1.0`
    pub internal_cutoff: f64,

    /// Subtrees with fewer distinct taxa are dropped after cutting.
    ///
    /// **Default**: `4`
    pub min_taxa: usize,

    /// Whether to mask monophyletic same-taxon tips.
    ///
    /// **Default**: `true`
    pub mask: bool,

    /// Whether masking also covers paraphyletic same-taxon tips.
    ///
    /// **Default**: `true`
    pub mask_paraphyly: bool,

    /// Taxon codes never masked (e.g. genomes).
    pub ignore: HashSet<String>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            relative_cutoff: DEFAULT_RELATIVE_CUTOFF,
            absolute_cutoff: DEFAULT_ABSOLUTE_CUTOFF,
            internal_cutoff: DEFAULT_INTERNAL_CUTOFF,
            min_taxa: DEFAULT_MIN_TAXA,
            mask: true,
            mask_paraphyly: true,
            ignore: HashSet::new(),
        }
    }
}

impl RefineConfig {
    /// Sets relative and absolute tip cutoffs.
    pub fn with_tip_cutoffs(mut self, relative_cutoff: f64, absolute_cutoff: f64) -> Self {
        self.relative_cutoff = relative_cutoff;
        self.absolute_cutoff = absolute_cutoff;
        self
    }

    /// Sets the internal branch cutoff.
    pub fn with_internal_cutoff(mut self, internal_cutoff: f64) -> Self {
        self.internal_cutoff = internal_cutoff;
        self
    }

    /// Sets the minimum number of taxa per subtree.
    pub fn with_min_taxa(mut self, min_taxa: usize) -> Self {
        self.min_taxa = min_taxa;
        self
    }

    /// Configures masking; `paraphyly` is only used when `mask` is set.
    pub fn with_masking(mut self, mask: bool, paraphyly: bool) -> Self {
        self.mask = mask;
        self.mask_paraphyly = paraphyly;
        self
    }

    /// Adds taxon codes to the ignore set.
    pub fn with_ignored_taxa<I, S>(mut self, taxa: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(taxa.into_iter().map(Into::into));
        self
    }
}
