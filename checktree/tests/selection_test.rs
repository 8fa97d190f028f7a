//! Tests for tri-state selection propagation

use checktree::domain::{
    DocumentNode, DomainError, Selection, SelectionPropagator, TreeArena, TreeBuilder, TriState,
};
use checktree::util::testing;
use rstest::{fixture, rstest};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[fixture]
fn home() -> TreeArena {
    TreeBuilder::new()
        .build(&[DocumentNode::folder(
            "Home",
            "Home",
            vec![
                DocumentNode::file("File1", "File1"),
                DocumentNode::file("File2", "File2"),
            ],
        )])
        .unwrap()
}

/// root{ a{ a1, a2, b{ b1 } }, c, e{} }, t
#[fixture]
fn deep() -> TreeArena {
    TreeBuilder::new()
        .build(&[
            DocumentNode::folder(
                "root",
                "root",
                vec![
                    DocumentNode::folder(
                        "a",
                        "a",
                        vec![
                            DocumentNode::file("a1", "a1"),
                            DocumentNode::file("a2", "a2"),
                            DocumentNode::folder("b", "b", vec![DocumentNode::file("b1", "b1")]),
                        ],
                    ),
                    DocumentNode::file("c", "c"),
                    DocumentNode::folder("e", "e", vec![]),
                ],
            ),
            DocumentNode::file("t", "t"),
        ])
        .unwrap()
}

fn all_ids(tree: &TreeArena) -> Vec<String> {
    tree.iter().map(|(_, node)| node.data.id.clone()).collect()
}

fn with_descendants(tree: &TreeArena, id: &str) -> Vec<String> {
    let idx = tree.index_of(id).unwrap();
    std::iter::once(id.to_string())
        .chain(tree.descendants(idx).map(|(_, node)| node.data.id.clone()))
        .collect()
}

fn membership(selection: &Selection, ids: &[String]) -> Vec<bool> {
    ids.iter().map(|id| selection.contains(id)).collect()
}

/// A mixed starting state built only through public operations.
fn mixed(tree: &TreeArena) -> Selection {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(tree, &mut selection);
    propagator.toggle_leaf("a1").unwrap();
    propagator.toggle_node("b").unwrap();
    propagator.toggle_leaf("t").unwrap();
    selection
}

// ============================================================
// Scenarios
// ============================================================

#[rstest]
fn given_home_when_toggling_folder_then_everything_selected(home: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&home, &mut selection);

    propagator.toggle_node("Home").unwrap();

    assert!(propagator.is_selected("Home").unwrap());
    assert!(propagator.is_selected("File1").unwrap());
    assert!(propagator.is_selected("File2").unwrap());
}

#[rstest]
fn given_home_when_toggling_one_file_then_parent_partial_and_unselected(home: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&home, &mut selection);

    propagator.toggle_leaf("File1").unwrap();

    assert!(propagator.is_selected("File1").unwrap());
    assert!(propagator.descendants_partially_selected("Home").unwrap());
    assert!(!propagator.is_selected("Home").unwrap());
    assert_eq!(propagator.tri_state("Home").unwrap(), TriState::Indeterminate);
}

#[rstest]
fn given_one_file_selected_when_toggling_the_other_then_parent_selected(home: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&home, &mut selection);
    propagator.toggle_leaf("File1").unwrap();

    propagator.toggle_leaf("File2").unwrap();

    assert!(propagator.descendants_all_selected("Home").unwrap());
    assert!(!propagator.descendants_partially_selected("Home").unwrap());
    assert!(propagator.is_selected("Home").unwrap());
    assert_eq!(propagator.tri_state("Home").unwrap(), TriState::Checked);
}

#[rstest]
fn given_all_selected_when_deselecting_one_file_then_parent_deselected(home: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&home, &mut selection);
    propagator.toggle_node("Home").unwrap();

    propagator.toggle_leaf("File2").unwrap();

    assert!(!propagator.is_selected("Home").unwrap());
    assert!(propagator.is_selected("File1").unwrap());
    assert_eq!(propagator.tri_state("Home").unwrap(), TriState::Indeterminate);
}

#[rstest]
fn given_deep_leaf_when_completing_subtree_then_selection_climbs_to_root(deep: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&deep, &mut selection);
    propagator.toggle_leaf("a1").unwrap();
    propagator.toggle_leaf("a2").unwrap();
    propagator.toggle_leaf("c").unwrap();
    propagator.toggle_leaf("e").unwrap();
    assert!(!propagator.is_selected("a").unwrap());

    propagator.toggle_leaf("b1").unwrap();

    assert!(propagator.is_selected("b").unwrap());
    assert!(propagator.is_selected("a").unwrap());
    assert!(propagator.is_selected("root").unwrap());
    assert!(!propagator.is_selected("t").unwrap());
}

#[rstest]
fn given_root_when_toggled_then_cascades_to_entire_tree(deep: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&deep, &mut selection);

    propagator.toggle_node("root").unwrap();

    assert_eq!(
        propagator.selection().selected_ids(&deep),
        vec!["root", "a", "a1", "a2", "b", "b1", "c", "e"]
    );
}

#[rstest]
fn given_childless_folder_when_queried_then_never_partial(deep: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&deep, &mut selection);
    assert!(propagator.descendants_all_selected("e").unwrap());
    assert!(!propagator.descendants_partially_selected("e").unwrap());
    assert_eq!(propagator.tri_state("e").unwrap(), TriState::Unchecked);

    propagator.toggle_node("e").unwrap();

    assert!(!propagator.descendants_partially_selected("e").unwrap());
    assert_eq!(propagator.tri_state("e").unwrap(), TriState::Checked);
}

#[rstest]
fn given_unknown_id_when_toggling_then_not_found_and_unchanged(deep: TreeArena) {
    let mut selection = mixed(&deep);
    let before = selection.clone();
    let mut propagator = SelectionPropagator::new(&deep, &mut selection);

    assert_eq!(
        propagator.toggle_node("ghost"),
        Err(DomainError::NotFound("ghost".into()))
    );
    assert_eq!(
        propagator.descendants_all_selected("ghost"),
        Err(DomainError::NotFound("ghost".into()))
    );
    assert_eq!(selection, before);
}

// ============================================================
// Properties over every node
// ============================================================

#[rstest]
#[case::from_empty(false)]
#[case::from_mixed(true)]
fn given_any_branch_when_toggled_twice_then_all_selected_tracks_new_state(
    deep: TreeArena,
    #[case] start_mixed: bool,
) {
    for id in all_ids(&deep) {
        let idx = deep.index_of(&id).unwrap();
        if deep.descendants(idx).next().is_none() {
            continue;
        }
        let mut selection = if start_mixed { mixed(&deep) } else { Selection::new() };
        let mut propagator = SelectionPropagator::new(&deep, &mut selection);

        for _ in 0..2 {
            propagator.toggle_node(&id).unwrap();
            let now_selected = propagator.is_selected(&id).unwrap();
            assert_eq!(
                propagator.descendants_all_selected(&id).unwrap(),
                now_selected,
                "node {id}"
            );
            if !now_selected {
                assert!(!propagator.descendants_partially_selected(&id).unwrap());
            }
        }
    }
}

#[rstest]
#[case::from_empty(false)]
#[case::from_mixed(true)]
fn given_any_leaf_when_toggled_then_other_leaves_unchanged(
    deep: TreeArena,
    #[case] start_mixed: bool,
) {
    let leaves = deep.leaf_nodes();
    for leaf in &leaves {
        let mut selection = if start_mixed { mixed(&deep) } else { Selection::new() };
        let others: Vec<String> = leaves.iter().filter(|l| *l != leaf).cloned().collect();
        let before = membership(&selection, &others);

        SelectionPropagator::new(&deep, &mut selection)
            .toggle_leaf(leaf)
            .unwrap();

        assert_eq!(membership(&selection, &others), before, "leaf {leaf}");
    }
}

#[rstest]
#[case::from_empty(false)]
#[case::from_mixed(true)]
fn given_any_node_when_reconciling_twice_then_same_as_once(
    deep: TreeArena,
    #[case] start_mixed: bool,
) {
    for id in all_ids(&deep) {
        let mut selection = if start_mixed { mixed(&deep) } else { Selection::new() };
        // Flipping a branch alone leaves its ancestors and subtree disagreeing.
        SelectionPropagator::new(&deep, &mut selection)
            .toggle_leaf("a")
            .unwrap();

        let mut propagator = SelectionPropagator::new(&deep, &mut selection);
        propagator.reconcile_ancestors(&id).unwrap();
        let once = propagator.selection().clone();
        propagator.reconcile_ancestors(&id).unwrap();

        assert_eq!(propagator.selection(), &once, "node {id}");
    }
}

#[rstest]
#[case::from_empty(false)]
#[case::from_all(true)]
fn given_uniform_subtree_when_toggled_twice_then_subtree_restored(
    deep: TreeArena,
    #[case] start_all: bool,
) {
    for id in all_ids(&deep) {
        let mut selection = Selection::new();
        if start_all {
            SelectionPropagator::new(&deep, &mut selection).select_all();
        }
        let subtree = with_descendants(&deep, &id);
        let before = membership(&selection, &subtree);

        let mut propagator = SelectionPropagator::new(&deep, &mut selection);
        propagator.toggle_node(&id).unwrap();
        propagator.toggle_node(&id).unwrap();

        assert_eq!(membership(&selection, &subtree), before, "node {id}");
    }
}

#[rstest]
fn given_any_toggle_sequence_when_done_then_every_branch_matches_its_descendants(deep: TreeArena) {
    let mut selection = Selection::new();
    let mut propagator = SelectionPropagator::new(&deep, &mut selection);
    for id in ["a1", "b", "c", "root", "a2", "e", "b1", "a"] {
        propagator.toggle(id).unwrap();

        for (idx, node) in deep.iter() {
            if node.is_leaf() {
                continue;
            }
            let all = deep
                .descendants(idx)
                .all(|(_, d)| propagator.selection().contains(&d.data.id));
            assert_eq!(
                propagator.selection().contains(&node.data.id),
                all,
                "after toggling {id}, node {}",
                node.data.id
            );
        }
    }
}
