use bst_set::Tree;

use std::collections::BTreeSet;

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of inserts
/// and removes we have the same values in both.
fn do_ops<T>(ops: &[Op<T>], bst: &mut Tree<T>, set: &mut BTreeSet<T>)
where
    T: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(x) => {
                bst.insert(x.clone());
                set.insert(x.clone());
            }
            Op::Remove(x) => {
                bst.remove(x);
                set.remove(x);
            }
            Op::Clear => {
                bst.clear();
                set.clear();
            }
        }
    }
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.size() == set.len()
        && (i8::MIN..=i8::MAX).all(|x| tree.exists(&x) == set.contains(&x))
}

#[quickcheck]
fn in_order_is_sorted(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    // Both render their values in ascending order as `{a, b, c}`.
    format!("{:?}", tree) == format!("{:?}", set)
}

#[quickcheck]
fn insert_is_idempotent(xs: Vec<i8>, x: i8) -> bool {
    let mut tree: Tree<_> = xs.into_iter().collect();
    tree.insert(x);
    let once = tree.clone();

    !tree.insert(x) && tree == once && tree.exists(&x)
}

#[quickcheck]
fn size_counts_distinct_values(xs: Vec<i8>) -> bool {
    let tree = Tree::from_values(xs.iter().copied());
    let distinct: BTreeSet<_> = xs.into_iter().collect();

    tree.size() == distinct.len()
}

#[quickcheck]
fn removed_values_are_gone(xs: Vec<i8>, removes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for x in &removes {
        tree.remove(x);
    }

    removes.iter().all(|x| !tree.exists(x))
        && xs
            .iter()
            .filter(|x| !removes.contains(*x))
            .all(|x| tree.exists(x))
}

#[quickcheck]
fn remove_absent_leaves_tree_equal(xs: Vec<i8>, x: i8) -> bool {
    let mut tree: Tree<_> = xs.into_iter().filter(|v| *v != x).collect();
    let before = tree.clone();

    !tree.remove(&x) && tree == before
}

#[quickcheck]
fn clones_diverge(xs: Vec<i8>, ops: Vec<Op<i8>>) -> bool {
    let original: Tree<_> = xs.into_iter().collect();
    let snapshot = format!("{:?}", original);
    let mut copy = original.clone();
    let mut set = BTreeSet::new();

    let equal_at_first = copy == original;
    do_ops(&ops, &mut copy, &mut set);

    equal_at_first && format!("{:?}", original) == snapshot
}

#[quickcheck]
fn same_insertion_order_same_tree(xs: Vec<i8>) -> bool {
    let lhs: Tree<_> = xs.iter().copied().collect();
    let rhs: Tree<_> = xs.iter().copied().collect();

    lhs == rhs && rhs == lhs
}
