//! An ordered map based on an AVL tree threaded with an in-order linked list.

use compare::{Compare, Natural};
use std::cmp::Ordering;
use std::cmp::Ordering::*;
use std::fmt::{self, Debug};
use std::hash::{self, Hash};
use std::iter;
use std::ops;
use std::sync::atomic::{self, AtomicUsize};
use super::cursor::Cursor;
use super::error::{Error, Result};
use super::node::{self, Left, Node, Right, Tree, TAIL};

fn next_id() -> usize {
    static NEXT_ID: AtomicUsize = AtomicUsize::new(0);
    NEXT_ID.fetch_add(1, atomic::Ordering::Relaxed)
}

/// An ordered map based on an AVL tree.
///
/// Besides the tree, the map keeps every entry on a doubly linked list in ascending key order,
/// so that stepping a [`Cursor`] and iterating take constant time per entry and the first and
/// last entries are available in constant time.
///
/// The behavior of this map is undefined if a key's ordering relative to any other key changes
/// while the key is in the map. This is normally only possible through `Cell`, `RefCell`, or
/// unsafe code.
///
/// The map is meant for use from one thread at a time; all mutation goes through `&mut self`.
pub struct Map<K, V, C = Natural<K>> where C: Compare<K> {
    pub(crate) tree: Tree<K, V>,
    cmp: C,
    pub(crate) id: usize,
}

impl<K, V> Map<K, V> where K: Ord {
    /// Creates an empty map ordered according to the natural order of its keys.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn new() -> Self { Map::with_cmp(compare::natural()) }
}

impl<K, V, C> Map<K, V, C> where C: Compare<K> {
    /// Creates an empty map ordered according to the given comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let mut map = threaded_avl::Map::with_cmp(natural().rev());
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn with_cmp(cmp: C) -> Self {
        Map { tree: Tree::new(), cmp: cmp, id: next_id() }
    }

    /// Checks if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(2, "b");
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.tree.len() == 0 }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.len(), 0);
    ///
    /// map.insert(2, "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.tree.len() }

    /// Returns a reference to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    ///
    /// let map: threaded_avl::Map<i32, &str> = threaded_avl::Map::new();
    /// assert!(map.cmp().compares_lt(&1, &2));
    ///
    /// let map: threaded_avl::Map<i32, &str, _> = threaded_avl::Map::with_cmp(natural().rev());
    /// assert!(map.cmp().compares_gt(&1, &2));
    /// ```
    pub fn cmp(&self) -> &C { &self.cmp }

    /// Removes all entries from the map.
    ///
    /// Cursors issued before the call no longer refer to entries.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.iter().next(), Some((&1, &"a")));
    ///
    /// map.clear();
    ///
    /// assert_eq!(map.len(), 0);
    /// assert_eq!(map.iter().next(), None);
    /// assert_eq!(map.begin(), map.end());
    /// ```
    pub fn clear(&mut self) { self.tree.clear(); }

    /// Inserts an entry into the map unless the map already contains the key.
    ///
    /// Returns a cursor to the entry holding the key, and `true` if the entry was inserted. If the
    /// key was already present, the map is left unchanged and the given key and value are
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// let (cursor, inserted) = map.insert(1, "a");
    /// assert!(inserted);
    /// assert_eq!(cursor.get(&map), Ok((&1, &"a")));
    ///
    /// let (again, inserted) = map.insert(1, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, cursor);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let (node, inserted) = node::insert(&mut self.tree, &self.cmp, key, value);
        (Cursor::new(node, self.id), inserted)
    }

    /// Removes the entry at the given cursor and returns its key and value.
    ///
    /// Fails with [`Error::InvalidCursor`], leaving the map untouched, if the cursor is the end
    /// cursor or was issued by another map. See [`Cursor`] for how erasure affects other
    /// cursors.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::{Error, Map};
    ///
    /// let mut map = Map::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let cursor = map.find(&1);
    /// assert_eq!(map.erase(cursor), Ok((1, "a")));
    /// assert_eq!(map.find(&1), map.end());
    /// assert_eq!(map.len(), 1);
    ///
    /// let end = map.end();
    /// assert_eq!(map.erase(end), Err(Error::InvalidCursor));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> {
        let node = cursor.slot(self)?;
        if !self.tree.is_live(node) { return Err(Error::InvalidCursor); }
        node::remove(&mut self.tree, &self.cmp, node).ok_or(Error::InvalidCursor)
    }

    /// Removes and returns the entry whose key is equal to the given key, returning
    /// `None` if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.len(), 3);
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.remove(&1), Some((1, "a")));
    ///
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get(&1), None);
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<(K, V)> where C: Compare<Q, K> {
        let node = node::find(&self.tree, &self.cmp, key)?;
        node::remove(&mut self.tree, &self.cmp, node)
    }

    /// Returns a cursor to the entry whose key is equal to the given key, or the end cursor if
    /// the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.find(&1).get(&map), Ok((&1, &"a")));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    pub fn find<Q: ?Sized>(&self, key: &Q) -> Cursor where C: Compare<Q, K> {
        let node = node::find(&self.tree, &self.cmp, key).unwrap_or(TAIL);
        Cursor::new(node, self.id)
    }

    /// Returns the number of entries whose key is equal to the given key, which is either `0`
    /// or `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.count(&1), 1);
    /// assert_eq!(map.count(&2), 0);
    /// ```
    pub fn count<Q: ?Sized>(&self, key: &Q) -> usize where C: Compare<Q, K> {
        if self.contains_key(key) { 1 } else { 0 }
    }

    /// Checks if the map contains the given key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert!(!map.contains_key(&1));
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool where C: Compare<Q, K> {
        node::find(&self.tree, &self.cmp, key).is_some()
    }

    /// Returns a reference to the value associated with the given key, or `None` if the
    /// map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// ```
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V> where C: Compare<Q, K> {
        let node = node::find(&self.tree, &self.cmp, key)?;
        self.tree.entry(node).map(|e| e.1)
    }

    /// Returns a mutable reference to the value associated with the given key, or `None`
    /// if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.get(&1), None);
    /// map.insert(1, "a");
    ///
    /// {
    ///     let value = map.get_mut(&1).unwrap();
    ///     assert_eq!(*value, "a");
    ///     *value = "b";
    /// }
    ///
    /// assert_eq!(map.get(&1), Some(&"b"));
    /// ```
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V> where C: Compare<Q, K> {
        let node = node::find(&self.tree, &self.cmp, key)?;
        self.tree.entry_mut(node).map(|e| e.1)
    }

    /// Returns a reference to the value associated with the given key.
    ///
    /// Fails with [`Error::KeyNotFound`] if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::{Error, Map};
    ///
    /// let mut map = Map::new();
    /// map.insert(1, "a");
    ///
    /// assert_eq!(map.at(&1), Ok(&"a"));
    /// assert_eq!(map.at(&2), Err(Error::KeyNotFound));
    /// ```
    pub fn at<Q: ?Sized>(&self, key: &Q) -> Result<&V> where C: Compare<Q, K> {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with the given key.
    ///
    /// Fails with [`Error::KeyNotFound`] if the map does not contain the key.
    pub fn at_mut<Q: ?Sized>(&mut self, key: &Q) -> Result<&mut V> where C: Compare<Q, K> {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value associated with the given key, first inserting
    /// the default value if the map does not contain the key.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut counts: threaded_avl::Map<&str, i32> = threaded_avl::Map::new();
    ///
    /// for s in vec!["a", "b", "a", "c", "a", "b"] {
    ///     *counts.get_or_insert_default(s) += 1;
    /// }
    ///
    /// assert_eq!(counts[&"a"], 3);
    /// assert_eq!(counts[&"b"], 2);
    /// assert_eq!(counts[&"c"], 1);
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V where V: Default {
        let node = match node::find(&self.tree, &self.cmp, &key) {
            Some(node) => node,
            None => node::insert(&mut self.tree, &self.cmp, key, V::default()).0,
        };

        self.tree.value_mut(node)
    }

    /// Returns a cursor to the entry with the smallest key, or the end cursor if the map is
    /// empty.
    pub fn begin(&self) -> Cursor { Cursor::new(self.tree.first(), self.id) }

    /// Returns the cursor one past the entry with the largest key.
    pub fn end(&self) -> Cursor { Cursor::new(TAIL, self.id) }

    /// Returns a reference to the map's first (smallest) key and a reference to its associated
    /// value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.first(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.first(), Some((&1, &"a")));
    /// ```
    pub fn first(&self) -> Option<(&K, &V)> { self.tree.entry(self.tree.first()) }

    /// Returns a reference to the map's last (largest) key and a reference to its associated
    /// value, or `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.last(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.last(), Some((&3, &"c")));
    /// ```
    pub fn last(&self) -> Option<(&K, &V)> { self.tree.entry(self.tree.last()) }

    /// Removes the map's first (smallest) key and returns it and its associated value, or `None`
    /// if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.pop_first(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.pop_first(), Some((1, "a")));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        node::remove_extremum::<K, V, Left>(&mut self.tree)
    }

    /// Removes the map's last (largest) key and returns it and its associated value, or `None`
    /// if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    /// assert_eq!(map.pop_last(), None);
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// assert_eq!(map.pop_last(), Some((3, "c")));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        node::remove_extremum::<K, V, Right>(&mut self.tree)
    }

    /// Returns an iterator over the map's entries with immutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.iter();
    /// assert_eq!(it.next(), Some((&1, &"a")));
    /// assert_eq!(it.next(), Some((&2, &"b")));
    /// assert_eq!(it.next(), Some((&3, &"c")));
    /// assert_eq!(it.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<K, V> { Iter(self.tree.iter()) }

    /// Returns an iterator over the map's entries with mutable references to the values.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert("b", 2);
    /// map.insert("a", 1);
    /// map.insert("c", 3);
    ///
    /// let mut i = 1;
    ///
    /// for (_, value) in map.iter_mut() {
    ///     assert_eq!(i, *value);
    ///     *value *= 2;
    ///     i += 1;
    /// }
    ///
    /// assert_eq!(map[&"a"], 2);
    /// assert_eq!(map[&"b"], 4);
    /// assert_eq!(map[&"c"], 6);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<K, V> { IterMut(self.tree.iter_mut()) }

    /// Verifies the map's structural invariants: keys in search-tree order, every node balanced
    /// with a correct cached height, and an order chain and length that agree with the tree.
    #[doc(hidden)]
    pub fn check_invariants(&self) -> std::result::Result<(), &'static str> {
        self.tree.check(&self.cmp)
    }
}

impl<K, V, C> Clone for Map<K, V, C> where K: Clone, V: Clone, C: Clone + Compare<K> {
    /// Copies the map. The copy issues its own cursors.
    fn clone(&self) -> Self {
        Map { tree: self.tree.clone(), cmp: self.cmp.clone(), id: next_id() }
    }

    /// Replaces the contents of this map with a copy of `source`'s, keeping this map's identity.
    fn clone_from(&mut self, source: &Self) {
        self.tree.clone_from(&source.tree);
        self.cmp = source.cmp.clone();
    }
}

impl<K, V, C> Debug for Map<K, V, C> where K: Debug, V: Debug, C: Compare<K> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;

        let mut it = self.iter();

        if let Some((k, v)) = it.next() {
            write!(f, "{:?}: {:?}", k, v)?;
            for (k, v) in it { write!(f, ", {:?}: {:?}", k, v)?; }
        }

        write!(f, "}}")
    }
}

impl<K, V, C> Default for Map<K, V, C> where C: Compare<K> + Default {
    fn default() -> Self { Map::with_cmp(Default::default()) }
}

impl<K, V, C> Extend<(K, V)> for Map<K, V, C> where C: Compare<K> {
    fn extend<I: IntoIterator<Item=(K, V)>>(&mut self, it: I) {
        for (k, v) in it { self.insert(k, v); }
    }
}

impl<K, V, C> iter::FromIterator<(K, V)> for Map<K, V, C> where C: Compare<K> + Default {
    fn from_iter<I: IntoIterator<Item=(K, V)>>(it: I) -> Self {
        let mut map: Self = Default::default();
        map.extend(it);
        map
    }
}

impl<K, V, C> Hash for Map<K, V, C> where K: Hash, V: Hash, C: Compare<K> {
    fn hash<H: hash::Hasher>(&self, h: &mut H) {
        for e in self.iter() { e.hash(h); }
    }
}

impl<'a, K, V, C, Q: ?Sized> ops::Index<&'a Q> for Map<K, V, C>
    where C: Compare<K> + Compare<Q, K> {

    type Output = V;
    fn index(&self, key: &'a Q) -> &V { self.get(key).expect("key not found") }
}

impl<'a, K, V, C> IntoIterator for &'a Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Iter<'a, K, V> { self.iter() }
}

impl<'a, K, V, C> IntoIterator for &'a mut Map<K, V, C> where C: Compare<K> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> IterMut<'a, K, V> { self.iter_mut() }
}

impl<K, V, C> IntoIterator for Map<K, V, C> where C: Compare<K> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Returns an iterator that consumes the map.
    ///
    /// The iterator yields the entries in ascending order according to the map's comparator.
    ///
    /// # Examples
    ///
    /// ```
    /// let mut map = threaded_avl::Map::new();
    ///
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    /// map.insert(3, "c");
    ///
    /// let mut it = map.into_iter();
    /// assert_eq!(it.next(), Some((1, "a")));
    /// assert_eq!(it.next(), Some((2, "b")));
    /// assert_eq!(it.next(), Some((3, "c")));
    /// assert_eq!(it.next(), None);
    /// ```
    fn into_iter(self) -> IntoIter<K, V> { IntoIter(self.tree.into_iter()) }
}

impl<K, V, C> PartialEq for Map<K, V, C> where V: PartialEq, C: Compare<K> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| {
            self.cmp.compares_eq(l.0, r.0) && l.1 == r.1
        })
    }
}

impl<K, V, C> Eq for Map<K, V, C> where V: Eq, C: Compare<K> {}

impl<K, V, C> PartialOrd for Map<K, V, C> where V: PartialOrd, C: Compare<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Some(Equal),
                (None, Some(_)) => return Some(Less),
                (Some(_), None) => return Some(Greater),
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.partial_cmp(r.1) {
                        Some(Equal) => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return Some(non_eq),
                },
            }
        }
    }
}

impl<K, V, C> Ord for Map<K, V, C> where V: Ord, C: Compare<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut l = self.iter();
        let mut r = other.iter();

        loop {
            match (l.next(), r.next()) {
                (None, None) => return Equal,
                (None, Some(_)) => return Less,
                (Some(_), None) => return Greater,
                (Some(l), Some(r)) => match self.cmp.compare(l.0, r.0) {
                    Equal => match l.1.cmp(r.1) {
                        Equal => {}
                        non_eq => return non_eq,
                    },
                    non_eq => return non_eq,
                },
            }
        }
    }
}

/// An iterator that consumes the map.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through the `IntoIterator` trait:
///
/// ```
/// let mut map = threaded_avl::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// for (key, value) in map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IntoIter<K, V>(node::Iter<Vec<Node<K, V>>>);

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);
    fn next(&mut self) -> Option<(K, V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> { self.0.next_back() }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

/// An iterator over the map's entries with immutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter`] or the `IntoIterator` trait:
///
/// ```
/// let mut map = threaded_avl::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// for (key, value) in &map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct Iter<'a, K: 'a, V: 'a>(node::Iter<&'a [Node<K, V>]>);

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Iter<'a, K, V> { Iter(self.0.clone()) }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    fn next(&mut self) -> Option<(&'a K, &'a V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}

/// An iterator over the map's entries with mutable references to the values.
///
/// The iterator yields the entries in ascending order according to the map's comparator.
///
/// # Examples
///
/// Acquire through [`Map::iter_mut`] or the `IntoIterator` trait:
///
/// ```
/// let mut map = threaded_avl::Map::new();
///
/// map.insert(2, "b");
/// map.insert(1, "a");
/// map.insert(3, "c");
///
/// for (key, value) in &mut map {
///     println!("{:?}: {:?}", key, value);
/// }
/// ```
pub struct IterMut<'a, K: 'a, V: 'a>(node::Iter<node::RawMut<'a, K, V>>);

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    fn next(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next() }
    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> DoubleEndedIterator for IterMut<'a, K, V> {
    fn next_back(&mut self) -> Option<(&'a K, &'a mut V)> { self.0.next_back() }
}

impl<'a, K, V> ExactSizeIterator for IterMut<'a, K, V> {}

#[cfg(test)]
mod test {
    use super::Map;
    use crate::Error;

    #[test]
    fn cursor_from_clone_is_foreign() {
        let mut map = Map::new();
        let (cursor, _) = map.insert(1, 'a');
        let copy = map.clone();

        assert_ne!(copy.find(&1), cursor);
        assert_eq!(cursor.get(&copy), Err(Error::InvalidCursor));
        assert_eq!(cursor.next(&copy), Err(Error::InvalidCursor));

        let mut copy = copy;
        assert_eq!(copy.erase(cursor), Err(Error::InvalidCursor));
        assert_eq!(copy.len(), 1);
        assert_eq!(map.erase(cursor), Ok((1, 'a')));
    }

    #[test]
    fn clone_from_keeps_identity() {
        let mut target = Map::new();
        let (stale, _) = target.insert(5, 5);
        let end = target.end();

        let source: Map<_, _> = (0..4).map(|i| (i, i * i)).collect();
        target.clone_from(&source);

        assert_eq!(target.end(), end);
        assert_eq!(target, source);
        assert!(target.check_invariants().is_ok());
        assert!(stale.get(&target).map_or(true, |(k, _)| *k != 5));
    }

    #[test]
    fn get_or_insert_default_inserts_once() {
        let mut map: Map<&str, Vec<u32>> = Map::new();
        map.get_or_insert_default("a").push(1);
        map.get_or_insert_default("a").push(2);

        assert_eq!(map.len(), 1);
        assert_eq!(map.at(&"a"), Ok(&vec![1, 2]));
        assert_eq!(map.at_mut(&"b"), Err(Error::KeyNotFound));
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let map: Map<_, _> = vec![(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{:?}", map), r#"{1: "a", 2: "b"}"#);
        assert_eq!(format!("{:?}", Map::<u8, u8>::new()), "{}");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a: Map<_, _> = vec![(1, 1), (2, 2)].into_iter().collect();
        let b: Map<_, _> = vec![(1, 1), (3, 0)].into_iter().collect();
        let c: Map<_, _> = vec![(1, 1)].into_iter().collect();

        assert!(a < b);
        assert!(c < a);
        assert_eq!(Ord::cmp(&a.clone(), &a), std::cmp::Ordering::Equal);
    }

    #[test]
    #[should_panic(expected = "key not found")]
    fn index_panics_on_missing_key() {
        let map: Map<u8, u8> = Map::new();
        let _ = map[&1];
    }
}
