use compare::{natural, Compare, Natural};
use quickcheck::{quickcheck, Arbitrary, Gen, TestResult};
use super::{Left, Right, Tree, HEAD, TAIL};

/// An operation on a `Tree`.
#[derive(Clone, Debug)]
enum Op<K> {
    /// Insert a key into the tree.
    Insert(K),
    /// Remove the node at position `n % tree.len()` in key order.
    Remove(usize),
    /// Remove the smallest (`true`) or largest (`false`) key.
    Pop(bool),
}

impl<K> Arbitrary for Op<K> where K: Arbitrary {
    fn arbitrary(gen: &mut Gen) -> Op<K> {
        match u8::arbitrary(gen) % 4 {
            0 | 1 => Op::Insert(K::arbitrary(gen)),
            2 => Op::Remove(usize::arbitrary(gen)),
            _ => Op::Pop(bool::arbitrary(gen)),
        }
    }
}

impl<K> Op<K> where K: Ord {
    /// Perform the operation on the given tree.
    fn exec(self, tree: &mut Tree<K, ()>) {
        let cmp: Natural<K> = natural();

        match self {
            Op::Insert(key) => { super::insert(tree, &cmp, key, ()); }
            Op::Remove(index) => if tree.len() > 0 {
                let id = nth(tree, index % tree.len());
                super::remove(tree, &cmp, id);
            },
            Op::Pop(true) => { super::remove_extremum::<_, _, Left>(tree); }
            Op::Pop(false) => { super::remove_extremum::<_, _, Right>(tree); }
        }
    }
}

fn nth<K, V>(tree: &Tree<K, V>, n: usize) -> usize {
    let mut id = tree.first();
    for _ in 0..n { id = tree.nodes[id].next; }
    id
}

fn keys<K: Clone, V>(tree: &Tree<K, V>) -> Vec<K> {
    tree.iter().map(|(k, _)| k.clone()).collect()
}

#[test]
fn test_avl() {
    fn check(ops: Vec<Op<u8>>) -> TestResult {
        let mut tree = Tree::new();

        for op in ops {
            op.exec(&mut tree);
            if let Err(err) = tree.check(&natural()) { return TestResult::error(err); }
        }

        TestResult::passed()
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn test_chain_matches_reverse_comparator() {
    fn check(keys: Vec<i16>) -> bool {
        let cmp = natural().rev();
        let mut tree = Tree::new();
        for key in keys.iter().cloned() { super::insert(&mut tree, &cmp, key, ()); }

        let mut expected = keys;
        expected.sort_by(|l, r| cmp.compare(l, r));
        expected.dedup();

        tree.check(&cmp).is_ok() && self::keys(&tree) == expected
    }

    quickcheck(check as fn(_) -> _);
}

#[test]
fn test_clone_rebuilds_chain() {
    fn check(keys: Vec<u16>, removals: Vec<usize>) -> bool {
        let cmp = natural();
        let mut tree = Tree::new();
        for key in keys { super::insert(&mut tree, &cmp, key, key as u32); }

        for index in removals {
            if tree.len() == 0 { break; }
            let id = nth(&tree, index % tree.len());
            super::remove(&mut tree, &cmp, id);
        }

        let copy = tree.clone();
        let mut assigned = Tree::new();
        super::insert(&mut assigned, &cmp, 7, 7);
        assigned.clone_from(&tree);

        copy.check(&cmp).is_ok() && assigned.check(&cmp).is_ok() &&
            copy.iter().eq(tree.iter()) && assigned.iter().eq(tree.iter()) &&
            copy.free.is_empty() && copy.nodes.len() == tree.len() + 2
    }

    quickcheck(check as fn(_, _) -> _);
}

#[test]
fn insert_links_after_predecessor() {
    let cmp = natural();
    let mut tree = Tree::new();

    let (b, _) = super::insert(&mut tree, &cmp, 'b', ());
    let (d, _) = super::insert(&mut tree, &cmp, 'd', ());
    let (a, _) = super::insert(&mut tree, &cmp, 'a', ());
    let (c, _) = super::insert(&mut tree, &cmp, 'c', ());

    assert_eq!(tree.nodes[HEAD].next, a);
    assert_eq!(tree.nodes[a].next, b);
    assert_eq!(tree.nodes[b].next, c);
    assert_eq!(tree.nodes[c].next, d);
    assert_eq!(tree.nodes[d].next, TAIL);
    assert_eq!(tree.nodes[TAIL].prev, d);
    assert_eq!(tree.nodes[a].prev, HEAD);
}

#[test]
fn duplicate_insert_returns_existing_slot() {
    let cmp = natural();
    let mut tree = Tree::new();

    let (id, inserted) = super::insert(&mut tree, &cmp, 1, "a");
    assert!(inserted);
    assert_eq!(super::insert(&mut tree, &cmp, 1, "b"), (id, false));
    assert_eq!(tree.entry(id), Some((&1, &"a")));
    assert_eq!(tree.len(), 1);
}

#[test]
fn two_child_removal_moves_successor_into_slot() {
    let cmp = natural();
    let mut tree = Tree::new();
    let mut ids = vec![];
    for key in &[20, 10, 30, 25, 40] { ids.push(super::insert(&mut tree, &cmp, *key, ()).0); }

    let root = tree.root.unwrap();
    assert_eq!(tree.key(root), &20);

    assert_eq!(super::remove(&mut tree, &cmp, root), Some((20, ())));
    assert_eq!(tree.entry(root), Some((&25, &())));
    assert!(!tree.is_live(ids[3]));
    assert_eq!(keys(&tree), [10, 25, 30, 40]);
    assert!(tree.check(&cmp).is_ok());
}

#[test]
fn released_slots_are_reused() {
    let cmp = natural();
    let mut tree = Tree::new();
    for key in 0..8 { super::insert(&mut tree, &cmp, key, ()); }

    let id = super::find(&tree, &cmp, &3).unwrap();
    super::remove(&mut tree, &cmp, id);
    let slots = tree.nodes.len();

    super::insert(&mut tree, &cmp, 100, ());
    assert_eq!(tree.nodes.len(), slots);
    assert!(tree.check(&cmp).is_ok());
}

#[test]
fn clear_resets_sentinels() {
    let cmp = natural();
    let mut tree = Tree::new();
    for key in 0..16 { super::insert(&mut tree, &cmp, key, ()); }

    tree.clear();
    assert_eq!(tree.first(), TAIL);
    assert_eq!(tree.last(), HEAD);
    assert_eq!(tree.nodes.len(), 2);
    assert!(tree.check(&cmp).is_ok());

    super::insert(&mut tree, &cmp, 1, ());
    assert_eq!(keys(&tree), [1]);
}

#[test]
fn ascending_inserts_stay_logarithmic() {
    let cmp = natural();
    let mut tree = Tree::new();
    for key in 0..1023 { super::insert(&mut tree, &cmp, key, ()); }

    assert_eq!(tree.height(tree.root), 10);
    assert!(tree.check(&cmp).is_ok());

    for key in 0..1000 {
        let id = super::find(&tree, &cmp, &key).unwrap();
        super::remove(&mut tree, &cmp, id);
        assert!(tree.check(&cmp).is_ok());
    }

    assert_eq!(keys(&tree), (1000..1023).collect::<Vec<_>>());
}

#[test]
fn iterators_walk_both_ends() {
    let cmp = natural();
    let mut tree = Tree::new();
    for key in &[4, 2, 6, 1, 3, 5, 7] { super::insert(&mut tree, &cmp, *key, *key * 10); }

    let mut it = tree.iter();
    assert_eq!(it.next(), Some((&1, &10)));
    assert_eq!(it.next_back(), Some((&7, &70)));
    assert_eq!(it.len(), 5);
    assert_eq!(it.rev().map(|e| *e.0).collect::<Vec<_>>(), [6, 5, 4, 3, 2]);

    for (_, value) in tree.iter_mut() { *value += 1; }
    assert_eq!(tree.into_iter().collect::<Vec<_>>(),
               [(1, 11), (2, 21), (3, 31), (4, 41), (5, 51), (6, 61), (7, 71)]);
}
