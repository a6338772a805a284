//! Reference-model equivalence harness shared by the unit tests and the
//! fuzz targets.

use std::collections::BTreeSet;

use arbitrary::Arbitrary;
use proptest::strategy::{Just, Strategy};

use crate::Bst;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    Index(usize),
    Random(u32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in 0u32..1000,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Remove(ItemValue),
    Contains(ItemValue),
    First,
    Last,
    Rebalance,
}

impl Op {
    fn finalize(self, sorted: &[u32]) -> FinalOp {
        fn get_value(v: &[u32], i: ItemValue) -> u32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as u32
                    } else {
                        v[idx % v.len().max(1)]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(sorted, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(sorted, item)),
            Op::Contains(item) => FinalOp::Contains(get_value(sorted, item)),
            Op::First => FinalOp::First,
            Op::Last => FinalOp::Last,
            Op::Rebalance => FinalOp::Rebalance,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(u32),
    Remove(u32),
    Contains(u32),
    First,
    Last,
    Rebalance,
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Remove),
        value_strategy().prop_map(Op::Contains),
        Just(Op::First),
        Just(Op::Last),
        Just(Op::Rebalance),
    ]
}

/// Applies `ops` to both a [`Bst`] and a [`BTreeSet`], asserting that every
/// observable result agrees and that the tree invariants hold throughout.
pub fn run_btree_equivalence(ops: Vec<Op>) {
    let mut sorted_values = Vec::with_capacity(ops.len());
    let mut btree = BTreeSet::new();
    let mut bst: Bst<u32> = Bst::new();

    fn insert_sorted(v: &mut Vec<u32>, value: u32) {
        if let Err(idx) = v.binary_search(&value) {
            v.insert(idx, value);
        }
    }

    fn remove_sorted(v: &mut Vec<u32>, value: u32) {
        if let Ok(idx) = v.binary_search(&value) {
            v.remove(idx);
        }
    }

    for (op_id, op) in ops.into_iter().enumerate() {
        let final_op = op.finalize(&sorted_values);

        match final_op {
            FinalOp::Insert(value) => {
                insert_sorted(&mut sorted_values, value);

                let from_btree = btree.insert(value);
                let from_bst = bst.insert(value);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Remove(value) => {
                remove_sorted(&mut sorted_values, value);

                let from_btree = btree.remove(&value).then_some(value);
                let from_bst = bst.remove(&value);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Contains(value) => {
                let from_btree = btree.contains(&value);
                let from_bst = bst.contains(&value);

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::First => {
                let from_btree = btree.first();
                let from_bst = bst.first();

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Last => {
                let from_btree = btree.last();
                let from_bst = bst.last();

                assert_eq!(from_btree, from_bst, "FinalOp #{op_id}: {op:?}");
            }

            FinalOp::Rebalance => {
                bst.rebalance();
                bst.assert_balanced();
            }
        }

        bst.assert_invariants();
        assert_eq!(btree.len(), bst.len());
        assert!(btree.iter().zip(bst.iter()).all(|(a, b)| a == b));
    }
}

/// Builds a tree from `keys`, rebalances it, and asserts that the AVL
/// invariant is established while the key sequence is untouched.
pub fn run_rebalance_invariants(keys: Vec<u32>) {
    let mut bst: Bst<u32> = Bst::new();

    for &key in &keys {
        bst.insert(key);
    }

    let before: Vec<u32> = bst.iter().copied().collect();

    bst.rebalance();
    bst.assert_invariants();
    bst.assert_balanced();

    let after: Vec<u32> = bst.iter().copied().collect();
    assert_eq!(before, after);

    // Rebalancing an already-balanced tree must not move anything.
    let shape: Vec<u32> = bst.pre_order().copied().collect();
    bst.rebalance();
    let reshaped: Vec<u32> = bst.pre_order().copied().collect();
    assert_eq!(shape, reshaped);
}
