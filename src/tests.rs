use std::ops::Range;

use proptest::prelude::*;

use crate::model;

use super::*;

fn insert_find_all(keys: &[u32]) {
    let mut tree: Bst<u32> = Bst::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        let found = tree.get(key).expect("item not found");
        assert_eq!(found, key);
    }
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all(keys: &[u32]) {
    let mut tree: Bst<u32> = Bst::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys {
        assert_eq!(tree.remove(key), Some(*key));
        tree.assert_invariants();
    }

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for key in keys.iter().rev() {
        assert_eq!(tree.remove(key), Some(*key));
        tree.assert_invariants();
    }

    assert!(tree.is_empty());
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all(&[0, 1, 2, 3]);
    insert_remove_all(&[0, 1, 3, 2]);
    insert_remove_all(&[0, 2, 1, 3]);
    insert_remove_all(&[0, 2, 3, 1]);
    insert_remove_all(&[0, 3, 1, 2]);
    insert_remove_all(&[0, 3, 2, 1]);

    insert_remove_all(&[1, 0, 2, 3]);
    insert_remove_all(&[1, 0, 3, 2]);
    insert_remove_all(&[1, 2, 0, 3]);
    insert_remove_all(&[1, 2, 3, 0]);
    insert_remove_all(&[1, 3, 0, 2]);
    insert_remove_all(&[1, 3, 2, 0]);

    insert_remove_all(&[2, 0, 1, 3]);
    insert_remove_all(&[2, 0, 3, 1]);
    insert_remove_all(&[2, 1, 0, 3]);
    insert_remove_all(&[2, 1, 3, 0]);
    insert_remove_all(&[2, 3, 0, 1]);
    insert_remove_all(&[2, 3, 1, 0]);

    insert_remove_all(&[3, 0, 1, 2]);
    insert_remove_all(&[3, 0, 2, 1]);
    insert_remove_all(&[3, 1, 0, 2]);
    insert_remove_all(&[3, 1, 2, 0]);
    insert_remove_all(&[3, 2, 0, 1]);
    insert_remove_all(&[3, 2, 1, 0]);
}

#[test]
fn in_order_is_sorted() {
    let tree: Bst<i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();

    let keys: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(keys, [1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn traversal_orders() {
    // Perfectly shaped by insertion order:
    //       4
    //     2   6
    //    1 3 5 7
    let tree: Bst<i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().collect();

    let pre: Vec<i32> = tree.pre_order().copied().collect();
    let in_: Vec<i32> = tree.iter().copied().collect();
    let post: Vec<i32> = tree.post_order().copied().collect();

    assert_eq!(pre, [4, 2, 1, 3, 6, 5, 7]);
    assert_eq!(in_, [1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(post, [1, 3, 2, 5, 7, 6, 4]);
}

#[test]
fn traverse_dispatches_order() {
    let tree: Bst<i32> = [2, 1, 3].into_iter().collect();

    let pre: Vec<i32> = tree.traverse(Traversal::PreOrder).copied().collect();
    let in_: Vec<i32> = tree.traverse(Traversal::InOrder).copied().collect();
    let post: Vec<i32> = tree.traverse(Traversal::PostOrder).copied().collect();

    assert_eq!(pre, [2, 1, 3]);
    assert_eq!(in_, [1, 2, 3]);
    assert_eq!(post, [1, 3, 2]);
}

#[test]
fn traversals_are_restartable() {
    let tree: Bst<i32> = [2, 1, 3].into_iter().collect();

    let first: Vec<i32> = tree.iter().copied().collect();
    let second: Vec<i32> = tree.iter().copied().collect();

    assert_eq!(first, second);
    assert_eq!(tree.iter().len(), 3);
}

#[test]
fn search_missing_key() {
    let tree: Bst<i32> = [5, 3, 8].into_iter().collect();

    assert!(!tree.contains(&99));
    assert!(tree.get(&99).is_none());
}

#[test]
fn first_and_last() {
    let empty: Bst<i32> = Bst::new();
    assert_eq!(empty.first(), None);
    assert_eq!(empty.last(), None);

    let tree: Bst<i32> = [5, 3, 8, 1, 9].into_iter().collect();
    assert_eq!(tree.first(), Some(&1));
    assert_eq!(tree.last(), Some(&9));
}

#[test]
fn duplicate_insert_is_noop() {
    let mut tree: Bst<i32> = Bst::new();

    assert!(tree.insert(7));
    assert!(!tree.insert(7));
    assert_eq!(tree.len(), 1);

    let shape: Vec<i32> = tree.pre_order().copied().collect();
    tree.insert(7);
    let reshaped: Vec<i32> = tree.pre_order().copied().collect();
    assert_eq!(shape, reshaped);
}

#[test]
fn remove_absent_is_noop() {
    let mut tree: Bst<i32> = [5, 3, 8].into_iter().collect();

    let shape: Vec<i32> = tree.pre_order().copied().collect();
    assert_eq!(tree.remove(&42), None);

    let reshaped: Vec<i32> = tree.pre_order().copied().collect();
    assert_eq!(shape, reshaped);
    assert_eq!(tree.len(), 3);
}

#[test]
fn remove_from_empty() {
    let mut tree: Bst<i32> = Bst::new();
    assert_eq!(tree.remove(&1), None);
    assert!(tree.is_empty());
}

#[test]
fn two_child_removal_promotes_successor() {
    let mut tree: Bst<i32> = [10, 5, 15].into_iter().collect();

    assert_eq!(tree.remove(&10), Some(10));
    tree.assert_invariants();

    // The successor (15, the minimum of the right subtree) takes the removed
    // key's place; its old position is vacated.
    let root = tree.root().unwrap();
    assert_eq!(root.key(), &15);
    assert_eq!(root.left().unwrap().key(), &5);
    assert!(root.right().is_none());
}

#[test]
fn rebalance_right_chain() {
    let mut tree: Bst<i32> = Bst::new();

    for key in 1..=5 {
        tree.insert(key);
    }

    // Strictly increasing inserts degenerate into a right-leaning chain, and
    // leaf heights stay cached at 1 until rebalance.
    assert_eq!(tree.height(), 1);

    tree.rebalance();
    tree.assert_invariants();
    tree.assert_balanced();

    assert_eq!(tree.height(), 3);

    let keys: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(keys, [1, 2, 3, 4, 5]);

    // The single bottom-up pass produces this exact shape.
    let shape: Vec<i32> = tree.pre_order().copied().collect();
    assert_eq!(shape, [2, 1, 4, 3, 5]);
}

#[test]
fn rebalance_left_chain() {
    let mut tree: Bst<i32> = Bst::new();

    for key in (1..=5).rev() {
        tree.insert(key);
    }

    tree.rebalance();
    tree.assert_invariants();
    tree.assert_balanced();

    assert_eq!(tree.height(), 3);

    let keys: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(keys, [1, 2, 3, 4, 5]);
}

#[test]
fn rebalance_seven_chain() {
    let mut tree: Bst<i32> = (1..=7).collect();

    tree.rebalance();
    tree.assert_invariants();

    // An imbalance of more than two takes several rotations at one node;
    // every node, not just the root, must end up with a balance factor in
    // {-1, 0, 1}.
    tree.assert_balanced();

    let keys: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(keys, [1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn rebalance_long_chains() {
    for n in [10, 33, 100, 1000] {
        let mut ascending: Bst<u32> = (0..n).collect();
        ascending.rebalance();
        ascending.assert_invariants();
        ascending.assert_balanced();
        assert_eq!(ascending.len(), n as usize);

        let mut descending: Bst<u32> = (0..n).rev().collect();
        descending.rebalance();
        descending.assert_invariants();
        descending.assert_balanced();
        assert_eq!(descending.len(), n as usize);
    }
}

#[test]
fn rebalance_is_idempotent() {
    let mut tree: Bst<u32> = (0..64).collect();

    tree.rebalance();
    let shape: Vec<u32> = tree.pre_order().copied().collect();

    tree.rebalance();
    let reshaped: Vec<u32> = tree.pre_order().copied().collect();

    assert_eq!(shape, reshaped);
}

#[test]
fn rebalance_preserves_keys() {
    let mut tree: Bst<u32> = [13, 2, 89, 34, 5, 55, 21, 1, 8, 3].into_iter().collect();

    let before: Vec<u32> = tree.iter().copied().collect();
    tree.rebalance();
    let after: Vec<u32> = tree.iter().copied().collect();

    assert_eq!(before, after);
    tree.assert_balanced();
}

#[test]
fn rebalance_empty_tree() {
    let mut tree: Bst<i32> = Bst::new();
    tree.rebalance();
    assert!(tree.is_empty());
}

#[test]
fn clear_resets_tree() {
    let mut tree: Bst<u32> = (0..100).collect();

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.iter().next(), None);

    tree.insert(7);
    assert_eq!(tree.len(), 1);
}

#[test]
fn deep_chain_drops_without_overflow() {
    let mut tree: Bst<u32> = Bst::new();

    for key in 0..10_000 {
        tree.insert(key);
    }

    // The tree is a 10k-deep chain; teardown must not recurse through it.
    drop(tree);
}

#[test]
fn node_ref_walks_shape() {
    let tree: Bst<i32> = [4, 2, 6].into_iter().collect();

    let root = tree.root().unwrap();
    assert_eq!(root.key(), &4);
    assert_eq!(root.left().unwrap().key(), &2);
    assert_eq!(root.right().unwrap().key(), &6);
    assert!(root.left().unwrap().left().is_none());
}

#[test]
fn dotgraph_empty() {
    let tree: Bst<i32> = Bst::new();

    let mut out = String::new();
    tree.dotgraph("t", &mut out).unwrap();
    assert_eq!(out, "digraph \"graph-t\" {}");
}

#[test]
fn dotgraph_links_children() {
    let tree: Bst<i32> = [2, 1, 3].into_iter().collect();

    let mut out = String::new();
    tree.dotgraph("t", &mut out).unwrap();

    assert!(out.contains("\"grapht-2\" -> \"grapht-1\";"));
    assert!(out.contains("\"grapht-2\" -> \"grapht-3\";"));
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn btree_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_btree_equivalence(ops);
    }

    #[test]
    fn rebalance_invariants(keys in proptest::collection::vec(0u32..1000, FUZZ_RANGE)) {
        model::run_rebalance_invariants(keys);
    }
}
