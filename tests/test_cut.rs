use rstest::rstest;
use std::collections::HashSet;
use treefish::model::Tree;
use treefish::newick::parse_str;
use treefish::refine::cut;

fn cut_newick(newick: &str, cutoff: f64, min_taxa: usize) -> Vec<String> {
    cut(parse_str(newick).unwrap(), cutoff, min_taxa)
        .iter()
        .map(Tree::to_newick)
        .collect()
}

fn tip_labels(tree: &Tree) -> Vec<String> {
    tree.front_labels(tree.root_index())
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_long_branch_between_two_clades() {
    let subtrees = cut_newick(
        "(((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):0.6,(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1):0.6):5.0,I@1:0.1,J@1:0.1);",
        1.0,
        4,
    );
    assert_eq!(
        subtrees,
        vec![
            "(A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1);",
            "(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);"
        ]
    );
}

#[test]
fn test_nothing_to_cut_returns_whole_tree() {
    assert_eq!(
        cut_newick("(A@1:0.1,B@1:0.2,C@1:0.1,D@1:0.3);", 1.0, 4),
        vec!["(A@1:0.1,B@1:0.2,C@1:0.1,D@1:0.3);"]
    );
}

#[test]
fn test_nothing_to_cut_still_needs_min_taxa() {
    assert!(cut_newick("(A@1:0.1,B@1:0.1,C@1:0.1);", 1.0, 4).is_empty());
    assert!(cut_newick("(A@1:0.1,A@2:0.1,B@1:0.1,C@1:0.1);", 1.0, 4).is_empty());
}

#[test]
fn test_nothing_to_cut_collapses_bifurcating_root() {
    assert_eq!(
        cut_newick("((A@1:0.1,B@1:0.1):0.2,(C@1:0.1,D@1:0.1):0.3);", 1.0, 4),
        vec!["(A@1:0.1,B@1:0.1,(C@1:0.1,D@1:0.1):0.5);"]
    );
}

#[test]
fn test_multifurcating_clade_is_split_off_whole() {
    assert_eq!(
        cut_newick(
            "((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):2.0,E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);",
            1.0,
            4
        ),
        vec![
            "(A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1);",
            "(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);"
        ]
    );
}

#[test]
fn test_short_child_branches_keep_clade_whole() {
    // 0.2 + 0.3 does not exceed the cutoff, so both child clades stay together
    assert_eq!(
        cut_newick(
            "(((A@1:0.1,B@1:0.1):0.2,(C@1:0.1,D@1:0.1):0.3):2.0,E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);",
            1.0,
            4
        ),
        vec![
            "(A@1:0.1,B@1:0.1,(C@1:0.1,D@1:0.1):0.5);",
            "(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);"
        ]
    );
}

#[test]
fn test_subtrees_sorted_by_taxa() {
    assert_eq!(
        cut_newick(
            "((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):2.0,E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1,K@1:0.1);",
            1.0,
            4
        ),
        vec![
            "(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1,K@1:0.1);",
            "(A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1);"
        ]
    );
}

#[test]
fn test_min_taxa_counts_taxa_not_tips() {
    // Five tips, but only three taxa
    assert_eq!(
        cut_newick(
            "((A@1:0.1,A@2:0.1,A@3:0.1,B@1:0.1,C@1:0.1):2.0,E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);",
            1.0,
            4
        ),
        vec!["(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);"]
    );
}

#[test]
fn test_everything_below_min_taxa() {
    let subtrees = cut_newick(
        "((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):2.0,E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1);",
        1.0,
        5,
    );
    assert!(subtrees.is_empty());
}

#[test]
fn test_residual_with_bifurcating_root_is_resolved() {
    // Root left with (E,F) and G after the cut is moved onto (E,F)
    assert_eq!(
        cut_newick(
            "((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):2.0,(E@1:0.1,F@1:0.1):0.1,G@1:0.1);",
            1.0,
            3
        ),
        vec![
            "(A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1);",
            "(E@1:0.1,F@1:0.1,G@1:0.2);"
        ]
    );
}

#[test]
fn test_two_tip_residual_has_no_root_kink() {
    // Cutting (C,D) leaves the root with the single child (A,B)
    assert_eq!(
        cut_newick("((A@1:0.1,B@1:0.1):0.1,(C@1:0.1,D@1:0.1):5.0);", 1.0, 2),
        vec!["(C@1:0.1,D@1:0.1);", "(A@1:0.1,B@1:0.1);"]
    );
}

#[test]
fn test_single_tip_residual() {
    assert_eq!(
        cut_newick("(A@1:0.1,(B@1:0.1,C@1:0.1):3.0);", 1.0, 1),
        vec!["(B@1:0.1,C@1:0.1);", "A@1;"]
    );
}

#[test]
fn test_missing_lengths_count_as_zero() {
    let newick = "((A@1,B@1,C@1,D@1),E@1,F@1);";
    assert_eq!(cut_newick(newick, 1.0, 4), vec![newick]);
}

const TWO_CLADES: &str = "(((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):0.6,(E@1:0.1,F@1:0.1,G@1:0.1,H@1:0.1):0.6):5.0,I@1:0.1,J@1:0.1);";
const NESTED: &str = "(((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):3.0,E@1:0.1,F@1:0.1,G@1:0.1):2.0,H@1:0.1,I@1:0.1,J@1:0.1,K@1:0.1);";
const SIBLINGS: &str = "((A@1:0.1,B@1:0.1,C@1:0.1,D@1:0.1):2.0,((E@1:0.1,F@1:0.1,G@1:0.1):1.5,(H@1:0.1,I@1:0.1,J@1:0.1,K@1:0.1):0.2):0.1,L@1:0.3);";
const SMALL_RESIDUAL: &str = "((A@1:0.1,B@1:0.1):0.1,(C@1:0.1,D@1:0.1):5.0);";
const DEEP_RESIDUAL: &str = "(X@1:0.1,(Y@1:0.1,(C@1:0.1,D@1:0.1,E@1:0.1):4.0):0.2);";

#[rstest]
#[case(TWO_CLADES, 3)]
#[case(NESTED, 3)]
#[case(SIBLINGS, 3)]
#[case(TWO_CLADES, 1)]
#[case(NESTED, 2)]
#[case(SIBLINGS, 1)]
#[case(SMALL_RESIDUAL, 1)]
#[case(SMALL_RESIDUAL, 2)]
#[case(DEEP_RESIDUAL, 1)]
#[case(DEEP_RESIDUAL, 2)]
fn test_subtrees_are_kink_free_and_disjoint(#[case] newick: &str, #[case] min_taxa: usize) {
    let tree = parse_str(newick).unwrap();
    let all_labels: HashSet<String> = tip_labels(&tree).into_iter().collect();

    let subtrees = cut(tree, 1.0, min_taxa);
    assert!(!subtrees.is_empty());

    let mut seen = HashSet::new();
    for subtree in &subtrees {
        assert!(subtree.is_valid());
        assert!(subtree.is_kink_free());
        assert!(subtree.count_taxa(subtree.root_index()) >= min_taxa);
        for label in tip_labels(subtree) {
            assert!(all_labels.contains(&label));
            assert!(seen.insert(label), "tip in more than one subtree");
        }
    }

    let taxa: Vec<usize> = subtrees
        .iter()
        .map(|t| t.count_taxa(t.root_index()))
        .collect();
    assert!(taxa.windows(2).all(|w| w[0] >= w[1]));
}
