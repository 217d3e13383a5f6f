//! Position handles into a map's order chain.

use compare::Compare;
use super::error::{Error, Result};
use super::map::Map;
use super::node::{HEAD, TAIL};

/// A position in a [`Map`], either at one of its entries or at its end.
///
/// A cursor is a plain handle: it borrows nothing, so it can be kept while the map is mutated
/// and handed back to [`Map::erase`]. Every operation takes the map explicitly and fails with
/// [`Error::InvalidCursor`] if the map is not the one that issued the cursor. Clones of a map
/// issue their own cursors, so a cursor never compares equal to one from another map even if
/// both refer to equal keys.
///
/// Erasing an entry invalidates cursors to it. With two children, the erased entry's slot is
/// reused for its in-order successor, so a cursor that pointed at the erased key afterwards
/// refers to the successor, while a cursor to the successor becomes dangling. Using a dangling
/// cursor is a logic error; it is memory safe but its result is unspecified.
///
/// # Examples
///
/// ```
/// use threaded_avl::Map;
///
/// let mut map = Map::new();
/// map.insert(1, "a");
/// map.insert(2, "b");
///
/// let cursor = map.begin();
/// assert_eq!(cursor.get(&map), Ok((&1, &"a")));
///
/// let cursor = cursor.next(&map).unwrap();
/// assert_eq!(cursor.get(&map), Ok((&2, &"b")));
///
/// let end = cursor.next(&map).unwrap();
/// assert_eq!(end, map.end());
/// assert!(end.get(&map).is_err());
/// assert!(end.next(&map).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    node: usize,
    map: usize,
}

impl Cursor {
    pub(crate) fn new(node: usize, map: usize) -> Self { Cursor { node: node, map: map } }

    pub(crate) fn slot<K, V, C>(&self, map: &Map<K, V, C>) -> Result<usize>
        where C: Compare<K> {

        if self.map == map.id && self.node < map.tree.nodes.len() {
            Ok(self.node)
        } else {
            Err(Error::InvalidCursor)
        }
    }

    /// Returns a cursor to the next entry in key order, or to the end if this is the last
    /// entry.
    ///
    /// Fails if this cursor is already at the end.
    pub fn next<K, V, C>(self, map: &Map<K, V, C>) -> Result<Cursor> where C: Compare<K> {
        let node = self.slot(map)?;
        if node == TAIL { return Err(Error::InvalidCursor); }
        Ok(Cursor { node: map.tree.nodes[node].next, ..self })
    }

    /// Returns a cursor to the previous entry in key order.
    ///
    /// Fails if this cursor is at the first entry (or at the end of an empty map).
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::Map;
    ///
    /// let mut map = Map::new();
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let last = map.end().prev(&map).unwrap();
    /// assert_eq!(last.get(&map), Ok((&2, &"b")));
    /// assert!(map.begin().prev(&map).is_err());
    /// ```
    pub fn prev<K, V, C>(self, map: &Map<K, V, C>) -> Result<Cursor> where C: Compare<K> {
        let node = self.slot(map)?;
        let prev = map.tree.nodes[node].prev;
        if node == HEAD || prev == HEAD { return Err(Error::InvalidCursor); }
        Ok(Cursor { node: prev, ..self })
    }

    /// Returns references to the key and value at this cursor.
    ///
    /// Fails at the end of the map.
    pub fn get<'a, K, V, C>(self, map: &'a Map<K, V, C>) -> Result<(&'a K, &'a V)>
        where C: Compare<K> {

        let node = self.slot(map)?;
        map.tree.entry(node).ok_or(Error::InvalidCursor)
    }

    /// Returns a reference to the key and a mutable reference to the value at this cursor.
    ///
    /// Fails at the end of the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use threaded_avl::Map;
    ///
    /// let mut map = Map::new();
    /// let (cursor, _) = map.insert("a", 1);
    ///
    /// *cursor.get_mut(&mut map).unwrap().1 += 1;
    /// assert_eq!(map.at(&"a"), Ok(&2));
    /// ```
    pub fn get_mut<'a, K, V, C>(self, map: &'a mut Map<K, V, C>) -> Result<(&'a K, &'a mut V)>
        where C: Compare<K> {

        let node = self.slot(map)?;
        map.tree.entry_mut(node).ok_or(Error::InvalidCursor)
    }

    /// Checks if this cursor is the end cursor of the given map.
    pub fn is_end<K, V, C>(self, map: &Map<K, V, C>) -> bool where C: Compare<K> {
        self == map.end()
    }
}
