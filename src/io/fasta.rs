//! FASTA input and output through `bio`.

use crate::error::RefineError;
use crate::model::Tree;
use crate::refine::UnambiguousCounts;
use crate::refine::mask::count_unambiguous;
use bio::io::fasta;
use log::debug;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

/// Sequence id and residues of one FASTA record
pub type FastaRecord = (String, Vec<u8>);

/// Reads all records of a FASTA file, in file order.
pub fn read_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, RefineError> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| RefineError::Fasta(e.to_string()))?;
        records.push((record.id().to_string(), record.seq().to_vec()));
    }
    Ok(records)
}

/// Reads a cleaned alignment and counts the unambiguous characters of each sequence.
pub fn read_unambiguous_counts<P: AsRef<Path>>(path: P) -> Result<UnambiguousCounts, RefineError> {
    let counts: UnambiguousCounts = read_fasta(path)?
        .into_iter()
        .map(|(id, seq)| {
            let count = count_unambiguous(&seq);
            (id, count)
        })
        .collect();
    debug!("read unambiguous counts of {} sequences", counts.len());
    Ok(counts)
}

/// Reads the ids of a FASTA file, e.g. bait sequences.
pub fn read_fasta_ids<P: AsRef<Path>>(path: P) -> Result<HashSet<String>, RefineError> {
    Ok(read_fasta(path)?.into_iter().map(|(id, _)| id).collect())
}

/// Writes the sequences of all leaves of `tree` to `path`, in leaf pre-order.
///
/// Every leaf is looked up before the file is created.
///
/// # Errors
/// [RefineError::MissingSequence] if a leaf has no sequence in `sequences`.
pub fn write_fasta_from_tree<P: AsRef<Path>>(
    tree: &Tree,
    sequences: &HashMap<String, Vec<u8>>,
    path: P,
) -> Result<usize, RefineError> {
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for label in tree.front_labels(tree.root_index()) {
        if !seen.insert(label) {
            continue;
        }
        let seq = sequences
            .get(label)
            .ok_or_else(|| RefineError::MissingSequence {
                label: label.to_string(),
            })?;
        selected.push((label, seq));
    }

    let mut writer = fasta::Writer::new(File::create(path)?);
    for (label, seq) in &selected {
        writer.write(label, None, seq)?;
    }
    writer.flush()?;
    Ok(selected.len())
}
