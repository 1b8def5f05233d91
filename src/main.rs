//! # Treefish CLI
//!
//! Runs the refinement stages on Newick tree files.
//!
//! ```bash
//! # Trim outlier tips, writes cluster1.tre.tt
//! treefish trim cluster1.tre
//!
//! # Mask same-taxon tips, writes cluster1.tre.tt.mm
//! treefish mask cluster1.tre.tt cluster1.aln-cln --ignore genomes.txt
//!
//! # Cut long internal branches, writes cluster1_1.subtree, cluster1_2.subtree, ...
//! treefish cut cluster1.tre.tt.mm --cutoff 0.8 --min-taxa 6
//!
//! # All three in one go
//! treefish -v refine cluster1.tre --alignment cluster1.aln-cln
//!
//! # Sequences of all tips of a subtree, writes out/cluster1_1.pep.fa
//! treefish extract-fasta cluster1_1.subtree all.pep.fa --out-dir out
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use treefish::config::{
    DEFAULT_ABSOLUTE_CUTOFF, DEFAULT_INTERNAL_CUTOFF, DEFAULT_MIN_TAXA, DEFAULT_RELATIVE_CUTOFF,
    RefineConfig,
};
use treefish::io::read_ignore_list;
use treefish::pipeline;

#[derive(Parser, Debug)]
#[command(name = "treefish", version, about = "Refine homolog trees: trim tips, mask same-taxon tips, cut long branches")]
struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remove tips on long branches, writes <tree>.tt
    Trim {
        /// Newick tree file
        tree: PathBuf,
        #[command(flatten)]
        cutoffs: TipCutoffs,
    },
    /// Mask monophyletic and paraphyletic same-taxon tips, writes <tree>.mm
    Mask {
        /// Newick tree file
        tree: PathBuf,
        /// Cleaned alignment (FASTA) holding every tip's sequence
        alignment: PathBuf,
        #[command(flatten)]
        masking: Masking,
    },
    /// Cut long internal branches, writes <stem>_<n>.subtree
    Cut {
        /// Newick tree file
        tree: PathBuf,
        #[command(flatten)]
        cutting: Cutting,
    },
    /// Trim, mask and cut without intermediate files
    Refine {
        /// Newick tree file
        tree: PathBuf,
        /// Cleaned alignment (FASTA); masking is skipped without it
        #[arg(short, long)]
        alignment: Option<PathBuf>,
        #[command(flatten)]
        cutoffs: TipCutoffs,
        #[command(flatten)]
        masking: Masking,
        #[command(flatten)]
        cutting: Cutting,
    },
    /// Write the sequences of all tips of a tree, writes <stem>.pep.fa
    ExtractFasta {
        /// Newick tree file
        tree: PathBuf,
        /// FASTA file containing all sequences
        fasta: PathBuf,
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct TipCutoffs {
    /// Trim tips longer than this and >10x their sister
    #[arg(long, default_value_t = DEFAULT_RELATIVE_CUTOFF)]
    relative_cutoff: f64,
    /// Trim tips longer than this
    #[arg(long, default_value_t = DEFAULT_ABSOLUTE_CUTOFF)]
    absolute_cutoff: f64,
}

#[derive(Args, Debug)]
struct Masking {
    /// Only mask monophyletic tips
    #[arg(long)]
    no_paraphyly: bool,
    /// File with taxon codes never masked, one per line
    #[arg(long)]
    ignore: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct Cutting {
    /// Cut internal branches longer than this
    #[arg(long, default_value_t = DEFAULT_INTERNAL_CUTOFF)]
    cutoff: f64,
    /// Keep subtrees with at least this many taxa
    #[arg(long, default_value_t = DEFAULT_MIN_TAXA)]
    min_taxa: usize,
}

impl TipCutoffs {
    fn apply(&self, config: RefineConfig) -> RefineConfig {
        config.with_tip_cutoffs(self.relative_cutoff, self.absolute_cutoff)
    }
}

impl Masking {
    fn apply(&self, config: RefineConfig) -> Result<RefineConfig, treefish::RefineError> {
        let config = config.with_masking(true, !self.no_paraphyly);
        match &self.ignore {
            Some(path) => Ok(config.with_ignored_taxa(read_ignore_list(path)?)),
            None => Ok(config),
        }
    }
}

impl Cutting {
    fn apply(&self, config: RefineConfig) -> RefineConfig {
        config
            .with_internal_cutoff(self.cutoff)
            .with_min_taxa(self.min_taxa)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    match cli.command {
        Command::Trim { tree, cutoffs } => {
            let config = cutoffs.apply(RefineConfig::default());
            if let Some(out) = pipeline::trim_tree_file(&tree, &config)? {
                println!("{}", out.display());
            }
        }
        Command::Mask {
            tree,
            alignment,
            masking,
        } => {
            let config = masking.apply(RefineConfig::default())?;
            if let Some(out) = pipeline::mask_tree_file(&tree, &alignment, &config)? {
                println!("{}", out.display());
            }
        }
        Command::Cut { tree, cutting } => {
            let config = cutting.apply(RefineConfig::default());
            for out in pipeline::cut_tree_file(&tree, &config)? {
                println!("{}", out.display());
            }
        }
        Command::Refine {
            tree,
            alignment,
            cutoffs,
            masking,
            cutting,
        } => {
            let config = cutting.apply(cutoffs.apply(masking.apply(RefineConfig::default())?));
            for out in pipeline::refine_tree_file(&tree, alignment.as_ref(), &config)? {
                println!("{}", out.display());
            }
        }
        Command::ExtractFasta {
            tree,
            fasta,
            out_dir,
        } => {
            let out = pipeline::extract_fasta_file(&tree, &fasta, &out_dir)?;
            println!("{}", out.display());
        }
    }

    Ok(())
}
