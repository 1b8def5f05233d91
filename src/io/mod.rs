//! Collaborator files around the tree refinement.
//!
//! * [fasta] - alignment FASTA to [UnambiguousCounts](crate::refine::UnambiguousCounts),
//!   bait ids, and FASTA extraction for the leaves of a tree
//! * [ignore] - taxon codes excluded from masking

pub mod fasta;
pub mod ignore;

pub use fasta::{read_fasta, read_fasta_ids, read_unambiguous_counts, write_fasta_from_tree};
pub use ignore::read_ignore_list;
