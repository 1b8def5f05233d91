use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use treefish::config::RefineConfig;
use treefish::newick::parse_str;
use treefish::pipeline::refine_tree;
use treefish::refine::UnambiguousCounts;

const NUM_TAXA: usize = 40;
const COPIES_PER_TAXON: usize = 3;
const NUM_CLADES: usize = 8;

/// Homolog tree of `NUM_CLADES` clades below long branches, each holding
/// `COPIES_PER_TAXON` nested copies of every taxon, with one long tip per clade.
fn homolog_tree() -> (String, UnambiguousCounts) {
    let mut counts = UnambiguousCounts::new();
    let mut clades = Vec::with_capacity(NUM_CLADES);

    for clade in 0..NUM_CLADES {
        let mut tips = Vec::with_capacity(NUM_TAXA);
        for taxon in 0..NUM_TAXA {
            let labels: Vec<String> = (0..COPIES_PER_TAXON)
                .map(|copy| format!("T{}@c{}s{}", taxon, clade, copy))
                .collect();
            for (copy, label) in labels.iter().enumerate() {
                counts.insert(label.clone(), 100 + copy * 7 + taxon % 5);
            }
            let length = if taxon == clade { 2.5 } else { 0.05 };
            tips.push(format!(
                "(({}:0.01,{}:0.02):0.01,{}:{})",
                labels[0], labels[1], labels[2], length
            ));
        }
        clades.push(format!("({}):1.8", tips.join(",")));
    }

    (format!("({});", clades.join(",")), counts)
}

fn parsing(c: &mut Criterion) {
    let (newick, _) = homolog_tree();
    c.bench_function("parse", |b| {
        b.iter(|| parse_str(black_box(&newick)).unwrap());
    });
}

fn refinement(c: &mut Criterion) {
    let (newick, counts) = homolog_tree();
    let tree = parse_str(&newick).unwrap();
    let config = RefineConfig::default();

    c.bench_function("refine", |b| {
        b.iter(|| refine_tree(black_box(tree.clone()), &config, &counts).unwrap());
    });
}

criterion_group!(regression, parsing);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = refinement
}
criterion_main!(regression, reporting);
