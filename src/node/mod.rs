mod iter;

#[cfg(test)]
mod test;

use compare::Compare;
use std::cmp::Ordering::*;
use std::mem;

pub use self::iter::{Iter, RawMut};

/// Slot of the sentinel that precedes the smallest entry in the order chain.
pub const HEAD: usize = 0;

/// Slot of the sentinel that follows the largest entry in the order chain.
pub const TAIL: usize = 1;

/// An owning link to a child subtree.
pub type Link = Option<usize>;

#[derive(Clone, Debug)]
pub struct Node<K, V> {
    pub left: Link,
    pub right: Link,
    pub prev: usize,
    pub next: usize,
    pub height: usize,
    pub entry: Option<(K, V)>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V) -> Self {
        Node { left: None, right: None, prev: HEAD, next: TAIL, height: 1, entry: Some((key, value)) }
    }

    fn sentinel() -> Self {
        Node { left: None, right: None, prev: HEAD, next: TAIL, height: 0, entry: None }
    }
}

/// The direction of a child link.
pub trait Dir {
    type Opposite: Dir<Opposite = Self>;

    /// The sign of the balance factor of a node that is heavy on this side.
    const BIAS: isize;

    const NAME: &'static str;

    fn child<K, V>(node: &Node<K, V>) -> Link;
    fn child_mut<K, V>(node: &mut Node<K, V>) -> &mut Link;
}

pub enum Left {}

impl Dir for Left {
    type Opposite = Right;
    const BIAS: isize = 1;
    const NAME: &'static str = "left";

    fn child<K, V>(node: &Node<K, V>) -> Link { node.left }
    fn child_mut<K, V>(node: &mut Node<K, V>) -> &mut Link { &mut node.left }
}

pub enum Right {}

impl Dir for Right {
    type Opposite = Left;
    const BIAS: isize = -1;
    const NAME: &'static str = "right";

    fn child<K, V>(node: &Node<K, V>) -> Link { node.right }
    fn child_mut<K, V>(node: &mut Node<K, V>) -> &mut Link { &mut node.right }
}

/// An AVL tree whose nodes live in a single arena and are threaded, in key order, by a doubly
/// linked list running from the `HEAD` sentinel to the `TAIL` sentinel.
///
/// Child links own their targets; `prev` and `next` are traversal-only back references. A node is
/// always unlinked from the chain before its slot is released.
pub struct Tree<K, V> {
    pub(crate) nodes: Vec<Node<K, V>>,
    free: Vec<usize>,
    pub(crate) root: Link,
    len: usize,
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Self { Tree::with_capacity(0) }

    fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 2);
        nodes.push(Node::sentinel());
        nodes.push(Node::sentinel());
        Tree { nodes: nodes, free: vec![], root: None, len: 0 }
    }

    pub fn len(&self) -> usize { self.len }

    /// Returns the slot of the smallest entry, or `TAIL` if the tree is empty.
    pub fn first(&self) -> usize { self.nodes[HEAD].next }

    /// Returns the slot of the largest entry, or `HEAD` if the tree is empty.
    pub fn last(&self) -> usize { self.nodes[TAIL].prev }

    /// Returns the slot's entry, or `None` for sentinels, released slots and out-of-range slots.
    pub fn entry(&self, id: usize) -> Option<(&K, &V)> {
        self.nodes.get(id).and_then(|node| node.entry.as_ref()).map(|(k, v)| (k, v))
    }

    pub fn entry_mut(&mut self, id: usize) -> Option<(&K, &mut V)> {
        self.nodes.get_mut(id).and_then(|node| node.entry.as_mut()).map(|(k, v)| (&*k, v))
    }

    pub fn is_live(&self, id: usize) -> bool { self.entry(id).is_some() }

    pub(crate) fn key(&self, id: usize) -> &K {
        match self.nodes[id].entry {
            Some((ref key, _)) => key,
            None => unreachable!("slot {} is not a live node", id),
        }
    }

    pub(crate) fn value_mut(&mut self, id: usize) -> &mut V {
        match self.nodes[id].entry {
            Some((_, ref mut value)) => value,
            None => unreachable!("slot {} is not a live node", id),
        }
    }

    fn alloc(&mut self, node: Node<K, V>) -> usize {
        match self.free.pop() {
            Some(id) => { self.nodes[id] = node; id }
            None => { self.nodes.push(node); self.nodes.len() - 1 }
        }
    }

    fn release(&mut self, id: usize) -> Option<(K, V)> {
        self.free.push(id);
        mem::replace(&mut self.nodes[id], Node::sentinel()).entry
    }

    /// Links `id` into the order chain immediately after `pred`.
    fn link_after(&mut self, id: usize, pred: usize) {
        let next = self.nodes[pred].next;
        self.nodes[id].prev = pred;
        self.nodes[id].next = next;
        self.nodes[pred].next = id;
        self.nodes[next].prev = id;
    }

    /// Unlinks `id` from the order chain.
    fn unlink(&mut self, id: usize) {
        let (prev, next) = (self.nodes[id].prev, self.nodes[id].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    pub fn clear(&mut self) {
        log::debug!("clearing tree of {} nodes", self.len);
        self.nodes.truncate(2);
        self.nodes[HEAD] = Node::sentinel();
        self.nodes[TAIL] = Node::sentinel();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<&[Node<K, V>]> {
        Iter::new(&self.nodes[..], self.first(), self.last(), self.len)
    }

    pub fn iter_mut(&mut self) -> Iter<RawMut<K, V>> {
        let (first, last, len) = (self.first(), self.last(), self.len);
        Iter::new(RawMut::new(&mut self.nodes), first, last, len)
    }

    pub fn into_iter(self) -> Iter<Vec<Node<K, V>>> {
        let (first, last, len) = (self.first(), self.last(), self.len);
        Iter::new(self.nodes, first, last, len)
    }
}

pub fn find<K, V, C, Q: ?Sized>(tree: &Tree<K, V>, cmp: &C, key: &Q) -> Link
    where C: Compare<Q, K> {

    let mut link = tree.root;

    while let Some(id) = link {
        link = match cmp.compare(key, tree.key(id)) {
            Equal => return Some(id),
            Less => tree.nodes[id].left,
            Greater => tree.nodes[id].right,
        };
    }

    None
}

/// Inserts the entry unless an equal key is present.
///
/// Returns the slot holding the key and whether a node was created.
pub fn insert<K, V, C>(tree: &mut Tree<K, V>, cmp: &C, key: K, value: V) -> (usize, bool)
    where C: Compare<K> {

    let root = tree.root;
    let (root, id, inserted) = insert_at(tree, root, HEAD, cmp, key, value);
    tree.root = Some(root);
    (id, inserted)
}

// `pred` is the last node at which the descent turned right, i.e. the in-order predecessor of
// any node created below `link`.
fn insert_at<K, V, C>(tree: &mut Tree<K, V>, link: Link, pred: usize, cmp: &C, key: K, value: V)
    -> (usize, usize, bool) where C: Compare<K> {

    let id = match link {
        None => {
            let id = tree.alloc(Node::new(key, value));
            tree.link_after(id, pred);
            tree.len += 1;
            return (id, id, true);
        }
        Some(id) => id,
    };

    let (found, inserted) = match cmp.compare(&key, tree.key(id)) {
        Equal => return (id, id, false),
        Less => {
            let left = tree.nodes[id].left;
            let (child, found, inserted) = insert_at(tree, left, pred, cmp, key, value);
            tree.nodes[id].left = Some(child);
            (found, inserted)
        }
        Greater => {
            let right = tree.nodes[id].right;
            let (child, found, inserted) = insert_at(tree, right, id, cmp, key, value);
            tree.nodes[id].right = Some(child);
            (found, inserted)
        }
    };

    if inserted { (tree.rebalance(id), found, true) } else { (id, found, false) }
}

/// Removes the live node `target`, returning its entry.
///
/// If `target` has two children, the entry of its in-order successor is moved into `target`'s
/// slot and the successor's slot is released instead.
pub fn remove<K, V, C>(tree: &mut Tree<K, V>, cmp: &C, target: usize) -> Option<(K, V)>
    where C: Compare<K> {

    let root = tree.root;
    let (root, _, detached) = remove_at(tree, root, cmp, target);
    tree.root = root;
    detached.and_then(|id| tree.release(id))
}

/// Removes the extremum in direction `D`, returning its entry.
pub fn remove_extremum<K, V, D>(tree: &mut Tree<K, V>) -> Option<(K, V)> where D: Dir {
    let root = tree.root?;
    let (root, _, detached) = detach_extremum::<K, V, D>(tree, root);
    tree.root = root;
    tree.release(detached)
}

// Each removal helper returns the new subtree root, whether the subtree's height decreased and
// the slot that was unlinked from the chain.

fn remove_at<K, V, C>(tree: &mut Tree<K, V>, link: Link, cmp: &C, target: usize)
    -> (Link, bool, Option<usize>) where C: Compare<K> {

    let id = match link {
        None => return (None, false, None),
        Some(id) => id,
    };

    let order = if id == target { Equal } else { cmp.compare(tree.key(target), tree.key(id)) };

    match order {
        Equal => remove_node(tree, id),
        Less => {
            let left = tree.nodes[id].left;
            let (child, shrunk, detached) = remove_at(tree, left, cmp, target);
            tree.nodes[id].left = child;
            let (id, shrunk) = if shrunk { tree.rebalance_shrunk(id) } else { (id, false) };
            (Some(id), shrunk, detached)
        }
        Greater => {
            let right = tree.nodes[id].right;
            let (child, shrunk, detached) = remove_at(tree, right, cmp, target);
            tree.nodes[id].right = child;
            let (id, shrunk) = if shrunk { tree.rebalance_shrunk(id) } else { (id, false) };
            (Some(id), shrunk, detached)
        }
    }
}

fn remove_node<K, V>(tree: &mut Tree<K, V>, id: usize) -> (Link, bool, Option<usize>) {
    match (tree.nodes[id].left, tree.nodes[id].right) {
        (Some(_), Some(right)) => {
            let (right, shrunk, successor) = detach_extremum::<K, V, Left>(tree, right);
            log::trace!("moving successor {} into node {} with two children", successor, id);
            tree.nodes[id].right = right;

            let entry = tree.nodes[successor].entry.take();
            tree.nodes[successor].entry = mem::replace(&mut tree.nodes[id].entry, entry);

            let (id, shrunk) = if shrunk { tree.rebalance_shrunk(id) } else { (id, false) };
            (Some(id), shrunk, Some(successor))
        }
        (left, right) => {
            log::trace!("splicing out node {} with at most one child", id);
            tree.unlink(id);
            tree.len -= 1;
            (left.or(right), true, Some(id))
        }
    }
}

fn detach_extremum<K, V, D>(tree: &mut Tree<K, V>, id: usize) -> (Link, bool, usize)
    where D: Dir {

    match D::child(&tree.nodes[id]) {
        Some(child) => {
            let (child, shrunk, detached) = detach_extremum::<K, V, D>(tree, child);
            *D::child_mut(&mut tree.nodes[id]) = child;
            let (id, shrunk) = if shrunk { tree.rebalance_shrunk(id) } else { (id, false) };
            (Some(id), shrunk, detached)
        }
        None => {
            tree.unlink(id);
            tree.len -= 1;
            (D::Opposite::child(&tree.nodes[id]), true, id)
        }
    }
}

impl<K, V> Clone for Tree<K, V> where K: Clone, V: Clone {
    fn clone(&self) -> Self {
        let mut tree = Tree::with_capacity(self.len);
        tree.copy_from(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.copy_from(source);
    }
}

impl<K, V> Tree<K, V> where K: Clone, V: Clone {
    // Copies the tree shape first and threads the order chain in a second, in-order pass.
    fn copy_from(&mut self, source: &Self) {
        log::debug!("copying tree of {} nodes", source.len);
        let root = source.root.map(|root| self.copy(source, root));
        self.root = root;
        self.len = source.len;
        self.link_order();
    }

    fn copy(&mut self, source: &Self, id: usize) -> usize {
        let node = &source.nodes[id];
        let left = node.left.map(|left| self.copy(source, left));
        let right = node.right.map(|right| self.copy(source, right));

        self.alloc(Node {
            left: left,
            right: right,
            prev: HEAD,
            next: TAIL,
            height: node.height,
            entry: node.entry.clone(),
        })
    }
}

impl<K, V> Tree<K, V> {
    fn link_order(&mut self) {
        let mut last = HEAD;
        let root = self.root;
        self.thread(root, &mut last);
        self.nodes[last].next = TAIL;
        self.nodes[TAIL].prev = last;
    }

    fn thread(&mut self, link: Link, last: &mut usize) {
        if let Some(id) = link {
            let (left, right) = (self.nodes[id].left, self.nodes[id].right);
            self.thread(left, last);
            self.nodes[*last].next = id;
            self.nodes[id].prev = *last;
            *last = id;
            self.thread(right, last);
        }
    }

    /// Verifies BST order, AVL balance, cached heights, and that the order chain and the length
    /// agree with an in-order walk of the tree.
    pub fn check<C>(&self, cmp: &C) -> Result<(), &'static str> where C: Compare<K> {
        fn walk<K, V, C>(tree: &Tree<K, V>, cmp: &C, link: Link, lo: Option<usize>,
                         hi: Option<usize>, order: &mut Vec<usize>)
            -> Result<usize, &'static str> where C: Compare<K> {

            let id = match link {
                None => return Ok(0),
                Some(id) => id,
            };

            if !tree.is_live(id) { return Err("tree links to a slot without an entry"); }
            if order.len() >= tree.len { return Err("tree holds more nodes than its length"); }

            if lo.map_or(false, |lo| !cmp.compares_lt(tree.key(lo), tree.key(id))) ||
               hi.map_or(false, |hi| !cmp.compares_lt(tree.key(id), tree.key(hi))) {
                return Err("keys are out of order");
            }

            let left = walk(tree, cmp, tree.nodes[id].left, lo, Some(id), order)?;
            order.push(id);
            let right = walk(tree, cmp, tree.nodes[id].right, Some(id), hi, order)?;

            if left.max(right) - left.min(right) > 1 { return Err("node is unbalanced"); }
            let height = 1 + left.max(right);
            if tree.nodes[id].height != height { return Err("cached height is stale"); }
            Ok(height)
        }

        let mut order = Vec::with_capacity(self.len);
        walk(self, cmp, self.root, None, None, &mut order)?;
        if order.len() != self.len { return Err("length disagrees with the tree"); }

        let mut prev = HEAD;
        for &id in &order {
            if self.nodes[prev].next != id || self.nodes[id].prev != prev {
                return Err("order chain disagrees with the tree");
            }
            prev = id;
        }

        if self.nodes[prev].next != TAIL || self.nodes[TAIL].prev != prev {
            return Err("order chain is not terminated by the tail");
        }

        Ok(())
    }
}
