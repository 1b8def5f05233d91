//! Crate-level error type.
//!
//! Newick syntax problems carry their own [ParsingError]; everything that can
//! go wrong at the file boundary or during masking is a [RefineError].
//! A tree that shrinks below the four-leaf floor is not an error: trimming
//! and masking report it as `None`.

use crate::parser::ParsingError;
use thiserror::Error;

/// Errors raised while refining trees.
#[derive(Debug, Error)]
pub enum RefineError {
    /// Malformed Newick input.
    #[error("could not parse tree: {0}")]
    Parse(#[from] ParsingError),

    /// A tip label has no entry in the alignment.
    #[error("no sequence for tip {label:?} in alignment")]
    MissingSequence { label: String },

    /// A FASTA file could not be read.
    #[error("invalid FASTA input: {0}")]
    Fasta(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
