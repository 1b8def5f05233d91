use std::collections::HashSet;
use treefish::model::{BranchLength, TraversalOrder, Tree};
use treefish::newick::parse_str;

fn labels_in(tree: &Tree, order: TraversalOrder) -> Vec<String> {
    tree.iter_nodes(tree.root_index(), order)
        .map(|v| v.label().unwrap_or("-").to_string())
        .collect()
}

/// Index of the tip with the given label.
fn tip(tree: &Tree, label: &str) -> usize {
    tree.pre_order_iter()
        .find(|v| v.label() == Some(label))
        .map(|v| v.index())
        .unwrap()
}

// ============= Construction =============

#[test]
fn test_building_tree() {
    let mut tree = Tree::new();
    let root = tree.add_vertex(None, None);
    let inner = tree.add_vertex(None, Some(BranchLength::new(1.5)));
    let l1 = tree.add_vertex(Some("Atha@1".to_string()), Some(BranchLength::new(1.0)));
    let l2 = tree.add_vertex(Some("Osat@1".to_string()), Some(BranchLength::new(1.0)));
    let l3 = tree.add_vertex(Some("Ppat@1".to_string()), Some(BranchLength::new(0.5)));
    tree.attach_child(root, l3);
    tree.attach_child(root, inner);
    tree.attach_child(inner, l1);
    tree.attach_child(inner, l2);
    tree.set_root(root);

    assert!(tree.is_valid());
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 2);
    assert_eq!(tree.num_vertices(), 5);
    assert_eq!(tree.root().index(), root);
    assert!(tree[l2].is_tip());
    assert!(tree[inner].is_internal());
    assert_eq!(tree[inner].branch_length(), Some(BranchLength::new(1.5)));
    assert_eq!(tree.to_newick(), "(Ppat@1:0.5,(Atha@1:1,Osat@1:1):1.5);");
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new();
    tree.root();
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new();
    let _ = &tree[55];
}

#[test]
#[should_panic]
fn test_negative_branch_length_panics() {
    BranchLength::new(-0.1);
}

#[test]
fn test_branch_length_try_new() {
    assert_eq!(BranchLength::try_new(-1.0), None);
    assert_eq!(BranchLength::try_new(f64::INFINITY), None);
    assert_eq!(*BranchLength::try_new(0.25).unwrap(), 0.25);
}

// ============= Traversal =============

#[test]
fn test_traversal_orders() {
    let tree = parse_str("((A,B)x,(C,D)y,E)r;").unwrap();
    assert_eq!(
        labels_in(&tree, TraversalOrder::PreOrder),
        vec!["r", "x", "A", "B", "y", "C", "D", "E"]
    );
    assert_eq!(
        labels_in(&tree, TraversalOrder::PostOrder),
        vec!["A", "B", "x", "C", "D", "y", "E", "r"]
    );
}

#[test]
fn test_traversal_from_vertex() {
    let tree = parse_str("((A,B)x,(C,D)y,E)r;").unwrap();
    let y = tree[tip(&tree, "C")].parent().unwrap();
    let labels: Vec<_> = tree.post_order_from(y).filter_map(|v| v.label()).collect();
    assert_eq!(labels, vec!["C", "D", "y"]);
}

// ============= Queries =============

#[test]
fn test_front_labels_and_names() {
    let tree = parse_str("((Atha@1,Atha@2),(Osat@1,Ppat@4),Atha@3);").unwrap();
    let root = tree.root_index();
    assert_eq!(
        tree.front_labels(root),
        vec!["Atha@1", "Atha@2", "Osat@1", "Ppat@4", "Atha@3"]
    );
    assert_eq!(
        tree.front_names(root),
        vec!["Atha", "Atha", "Osat", "Ppat", "Atha"]
    );
    assert_eq!(tree.count_taxa(root), 3);
    assert_eq!(tree.leaves(root).len(), 5);
}

#[test]
fn test_count_taxa_of_clade() {
    let tree = parse_str("((Atha@1,Atha@2),(Osat@1,Ppat@4),Atha@3);").unwrap();
    let clade = tree[tip(&tree, "Atha@1")].parent().unwrap();
    assert_eq!(tree.count_taxa(clade), 1);
}

#[test]
fn test_sisters() {
    let tree = parse_str("((A,B),C,D);").unwrap();
    let c = tip(&tree, "C");
    let sisters: Vec<_> = tree
        .sisters(c)
        .into_iter()
        .map(|i| tree[i].label().unwrap_or("-"))
        .collect();
    assert_eq!(sisters, vec!["-", "D"]);
    assert!(tree.sisters(tree.root_index()).is_empty());
}

#[test]
fn test_contains_any_label() {
    let tree = parse_str("((Atha@1,Osat@1),Ppat@1);").unwrap();
    let baits: HashSet<String> = ["Osat@1".to_string()].into();
    let others: HashSet<String> = ["Osat@2".to_string()].into();
    assert!(tree.contains_any_label(&baits));
    assert!(!tree.contains_any_label(&others));
}

// ============= Prune and remove kink =============

#[test]
fn test_prune_tip_leaves_kink() {
    let mut tree = parse_str("((A:1,B:2):3,C:4);").unwrap();
    let a = tip(&tree, "A");
    let parent = tree.prune(a).unwrap();

    assert!(tree[parent].is_kink());
    assert!(!tree.is_kink_free());
    assert_eq!(tree.num_leaves(), 2);
    assert!(!tree[a].has_parent());
}

#[test]
fn test_remove_kink_keeps_position_and_sums_lengths() {
    let mut tree = parse_str("(X:1,(A:1,B:2):3,C:4);").unwrap();
    let parent = tree.prune(tip(&tree, "A")).unwrap();
    let (anchor, root) = tree.remove_kink(parent);

    assert_eq!(tree[anchor].label(), Some("B"));
    assert_eq!(root, tree.root_index());
    assert_eq!(tree.to_newick(), "(X:1,B:5,C:4);");
    assert!(tree.is_valid());
}

#[test]
fn test_remove_kink_on_root_with_one_child() {
    let mut tree = parse_str("((A:1,B:2,C:3):0.5):0.1;").unwrap();
    let old_root = tree.root_index();
    let (anchor, root) = tree.remove_kink(old_root);

    assert_eq!(anchor, root);
    assert_eq!(tree.root_index(), root);
    assert_ne!(root, old_root);
    assert!(!tree.root().has_parent());
    assert_eq!(tree.to_newick(), "(A:1,B:2,C:3):0.1;");
}

#[test]
fn test_remove_kink_on_root_bifurcation() {
    let mut tree = parse_str("(A:1,(B:2,C:3):4);").unwrap();
    tree.remove_kink(tree.root_index());

    assert!(tree.is_valid());
    assert_eq!(tree.root().num_children(), 3);
    assert_eq!(tree.to_newick(), "(B:2,C:3,A:5);");
}

#[test]
fn test_remove_kink_on_root_bifurcation_of_tips() {
    let mut tree = parse_str("(A:1,B:2);").unwrap();
    let root = tree.root_index();
    assert_eq!(tree.remove_kink(root), (root, root));
    assert_eq!(tree.to_newick(), "(A:1,B:2);");
}

#[test]
fn test_remove_kink_on_bifurcation_is_noop() {
    let mut tree = parse_str("((A:1,B:2):3,C:4,D:1);").unwrap();
    let inner = tree[tip(&tree, "A")].parent().unwrap();
    tree.remove_kink(inner);
    assert_eq!(tree.to_newick(), "((A:1,B:2):3,C:4,D:1);");
}

// ============= Extraction =============

#[test]
fn test_extract_subtree() {
    let mut tree = parse_str("((A@1:1,(B@1:2,C@2:3)90:0.5):3,D@1:4);").unwrap();
    tree.set_name("cluster4.tre".to_string());
    let clade = tree[tip(&tree, "A@1")].parent().unwrap();

    let subtree = tree.extract_subtree(clade);
    assert!(subtree.is_valid());
    assert_eq!(subtree.to_newick(), "(A@1:1,(B@1:2,C@2:3)90:0.5);");
    assert_eq!(subtree.num_vertices(), subtree.arena_len());
    assert_eq!(subtree.name().map(String::as_str), Some("cluster4.tre"));

    // Source is untouched
    assert_eq!(tree.num_leaves(), 4);
}

#[test]
fn test_extract_after_prune_compacts_arena() {
    let mut tree = parse_str("((A:1,B:1):1,(C:1,D:1):1,E:1);").unwrap();
    let clade = tree[tip(&tree, "C")].parent().unwrap();
    tree.prune(clade);

    let compact = tree.extract_subtree(tree.root_index());
    assert_eq!(tree.arena_len(), 8);
    assert_eq!(compact.arena_len(), 5);
    assert_eq!(compact.to_newick(), "((A:1,B:1):1,E:1);");
}
