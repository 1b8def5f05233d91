//! Refinement stages on files and the in-memory composition of all three.
//!
//! Each stage reads one Newick tree and writes its result next to the input:
//!
//! | Stage                | Output                          |
//! |----------------------|---------------------------------|
//! | [trim_tree_file]     | `<input>.tt`                    |
//! | [mask_tree_file]     | `<input>.mm`                    |
//! | [cut_tree_file]      | `<dir>/<stem>_<n>.subtree`      |
//! | [refine_tree_file]   | `<dir>/<stem>_<n>.subtree`      |
//!
//! `stem` is the input file name up to its first `.`, and subtrees are
//! numbered from 1 in descending order of their number of taxa.
//! Trimming and masking write nothing for a tree that falls below four
//! leaves.

use crate::config::RefineConfig;
use crate::error::RefineError;
use crate::io::fasta::{read_fasta, write_fasta_from_tree};
use crate::io::read_unambiguous_counts;
use crate::model::Tree;
use crate::newick::{self, write_newick_file};
use crate::refine::{UnambiguousCounts, cut, mask, trim};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extension appended by [trim_tree_file]
pub const TRIMMED_EXTENSION: &str = "tt";
/// Extension appended by [mask_tree_file]
pub const MASKED_EXTENSION: &str = "mm";
/// Extension of the files written by [cut_tree_file]
pub const SUBTREE_EXTENSION: &str = "subtree";
/// Suffix of the files written by [extract_fasta_file]
pub const PEPTIDE_FASTA_SUFFIX: &str = ".pep.fa";

// ============================================================================
// IN MEMORY
// ============================================================================
/// Trims, masks (if configured) and cuts a tree.
///
/// # Returns
/// The subtrees in descending order of their number of taxa; empty if the
/// tree was discarded by trimming or masking.
///
/// # Errors
/// [RefineError::MissingSequence] if masking is on and a leaf has no count.
pub fn refine_tree(
    tree: Tree,
    config: &RefineConfig,
    counts: &UnambiguousCounts,
) -> Result<Vec<Tree>, RefineError> {
    let Some(tree) = trim(tree, config.relative_cutoff, config.absolute_cutoff) else {
        return Ok(Vec::new());
    };

    let tree = if config.mask {
        match mask(tree, counts, &config.ignore, config.mask_paraphyly)? {
            Some(tree) => tree,
            None => return Ok(Vec::new()),
        }
    } else {
        tree
    };

    Ok(cut(tree, config.internal_cutoff, config.min_taxa))
}

/// Parses a Newick string and refines it, see [refine_tree].
///
/// # Example
/// ```
/// use treefish::config::RefineConfig;
/// use treefish::pipeline::refine_str;
/// use treefish::refine::UnambiguousCounts;
///
/// let config = RefineConfig::default().with_masking(false, false);
/// let subtrees = refine_str(
///     "((A@1:0.1,B@1:0.1,C@1:0.1):0.2,D@1:0.1,E@1:0.1);",
///     &config,
///     &UnambiguousCounts::new(),
/// )?;
/// assert_eq!(subtrees.len(), 1);
/// # Ok::<(), treefish::RefineError>(())
/// ```
pub fn refine_str(
    newick: &str,
    config: &RefineConfig,
    counts: &UnambiguousCounts,
) -> Result<Vec<Tree>, RefineError> {
    refine_tree(newick::parse_str(newick)?, config, counts)
}

// ============================================================================
// FILE STAGES
// ============================================================================
/// Trims the tree in `path` and writes it to `<path>.tt`.
///
/// # Returns
/// The written path, or `None` if the tree was discarded.
pub fn trim_tree_file<P: AsRef<Path>>(
    path: P,
    config: &RefineConfig,
) -> Result<Option<PathBuf>, RefineError> {
    let path = path.as_ref();
    let tree = newick::parse_file(path)?;
    let before = tree.num_leaves();

    let Some(trimmed) = trim(tree, config.relative_cutoff, config.absolute_cutoff) else {
        info!("fewer than four tips left in {}, nothing written", path.display());
        return Ok(None);
    };

    let out = append_extension(path, TRIMMED_EXTENSION);
    info!(
        "trimmed {} tip(s), writing to {}",
        before - trimmed.num_leaves(),
        out.display()
    );
    write_newick_file(&out, &trimmed)?;
    Ok(Some(out))
}

/// Masks the tree in `path` against the alignment in `alignment` and
/// writes it to `<path>.mm`.
///
/// # Returns
/// The written path, or `None` if the tree was discarded.
pub fn mask_tree_file<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    alignment: Q,
    config: &RefineConfig,
) -> Result<Option<PathBuf>, RefineError> {
    let path = path.as_ref();
    let counts = read_unambiguous_counts(alignment)?;
    let tree = newick::parse_file(path)?;
    let before = tree.num_leaves();

    let Some(masked) = mask(tree, &counts, &config.ignore, config.mask_paraphyly)? else {
        info!("fewer than four tips left in {}, nothing written", path.display());
        return Ok(None);
    };

    let out = append_extension(path, MASKED_EXTENSION);
    info!(
        "masked {} tip(s), writing to {}",
        before - masked.num_leaves(),
        out.display()
    );
    write_newick_file(&out, &masked)?;
    Ok(Some(out))
}

/// Cuts the tree in `path` and writes each subtree to `<dir>/<stem>_<n>.subtree`.
///
/// # Returns
/// The written paths, in output order.
pub fn cut_tree_file<P: AsRef<Path>>(
    path: P,
    config: &RefineConfig,
) -> Result<Vec<PathBuf>, RefineError> {
    let path = path.as_ref();
    info!(
        "cutting {} at branches longer than {}",
        path.display(),
        config.internal_cutoff
    );
    let tree = newick::parse_file(path)?;
    let subtrees = cut(tree, config.internal_cutoff, config.min_taxa);
    write_subtrees(path, &subtrees)
}

/// Trims, masks (if configured) and cuts the tree in `path` without
/// writing intermediate files.
///
/// Masking needs the counts from `alignment`; without one it is skipped.
///
/// # Returns
/// The written subtree paths; empty if the tree was discarded.
pub fn refine_tree_file<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    alignment: Option<Q>,
    config: &RefineConfig,
) -> Result<Vec<PathBuf>, RefineError> {
    let path = path.as_ref();
    let unmasked;
    let (config, counts) = match alignment {
        Some(alignment) if config.mask => (config, read_unambiguous_counts(alignment)?),
        None if config.mask => {
            info!("no alignment for {}, skipping masking", path.display());
            unmasked = config.clone().with_masking(false, false);
            (&unmasked, UnambiguousCounts::new())
        }
        _ => (config, UnambiguousCounts::new()),
    };

    let tree = newick::parse_file(path)?;
    let subtrees = refine_tree(tree, config, &counts)?;
    if subtrees.is_empty() {
        info!("no subtree left of {}", path.display());
    }
    write_subtrees(path, &subtrees)
}

/// Writes the sequences of all leaves of the tree in `tree_path` from
/// `master_fasta` to `<out_dir>/<stem>.pep.fa`.
pub fn extract_fasta_file<P, Q, R>(
    tree_path: P,
    master_fasta: Q,
    out_dir: R,
) -> Result<PathBuf, RefineError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let tree_path = tree_path.as_ref();
    let tree = newick::parse_file(tree_path)?;
    let sequences: HashMap<String, Vec<u8>> = read_fasta(master_fasta)?.into_iter().collect();

    let out = out_dir
        .as_ref()
        .join(format!("{}{}", file_stem(tree_path), PEPTIDE_FASTA_SUFFIX));
    let written = write_fasta_from_tree(&tree, &sequences, &out)?;
    info!("wrote {} sequence(s) to {}", written, out.display());
    Ok(out)
}

// ============================================================================
// NAMING
// ============================================================================
/// File name up to its first `.`, e.g. `cluster12` for `cluster12.raxml.tre.tt.mm`.
pub fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// Path of the `n`-th subtree (counting from 1) cut from the tree in `path`.
pub fn subtree_path(path: &Path, n: usize) -> PathBuf {
    let name = format!("{}_{}.{}", file_stem(path), n, SUBTREE_EXTENSION);
    path.with_file_name(name)
}

fn append_extension(path: &Path, extension: &str) -> PathBuf {
    let mut out = path.as_os_str().to_owned();
    out.push(".");
    out.push(extension);
    PathBuf::from(out)
}

fn write_subtrees(path: &Path, subtrees: &[Tree]) -> Result<Vec<PathBuf>, RefineError> {
    let mut written = Vec::with_capacity(subtrees.len());
    for (i, subtree) in subtrees.iter().enumerate() {
        let out = subtree_path(path, i + 1);
        info!(
            "writing subtree with {} tip(s) to {}",
            subtree.num_leaves(),
            out.display()
        );
        write_newick_file(&out, subtree)?;
        written.push(out);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem_cuts_at_first_dot() {
        assert_eq!(file_stem(Path::new("/data/cluster12.raxml.tre.tt.mm")), "cluster12");
        assert_eq!(file_stem(Path::new("cluster3")), "cluster3");
    }

    #[test]
    fn test_subtree_path() {
        assert_eq!(
            subtree_path(Path::new("/data/cluster12.tre.mm"), 2),
            PathBuf::from("/data/cluster12_2.subtree")
        );
    }

    #[test]
    fn test_append_extension() {
        assert_eq!(
            append_extension(Path::new("/data/cluster12.tre"), TRIMMED_EXTENSION),
            PathBuf::from("/data/cluster12.tre.tt")
        );
    }
}
