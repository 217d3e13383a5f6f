use std::marker::PhantomData;
use std::ptr::NonNull;
use super::Node;

/// A view of the node arena through which an iterator walks the order chain.
pub trait NodeSlice {
    type Item;
    fn next(&self, id: usize) -> usize;
    fn prev(&self, id: usize) -> usize;

    /// Yields the entry in slot `id`. Called at most once per slot.
    fn item(&mut self, id: usize) -> Option<Self::Item>;
}

impl<'a, K, V> NodeSlice for &'a [Node<K, V>] {
    type Item = (&'a K, &'a V);

    fn next(&self, id: usize) -> usize { self[id].next }
    fn prev(&self, id: usize) -> usize { self[id].prev }

    fn item(&mut self, id: usize) -> Option<(&'a K, &'a V)> {
        let nodes: &'a [Node<K, V>] = *self;
        nodes[id].entry.as_ref().map(|(k, v)| (k, v))
    }
}

impl<K, V> NodeSlice for Vec<Node<K, V>> {
    type Item = (K, V);

    fn next(&self, id: usize) -> usize { self[id].next }
    fn prev(&self, id: usize) -> usize { self[id].prev }
    fn item(&mut self, id: usize) -> Option<(K, V)> { self[id].entry.take() }
}

/// A mutable view of the node arena that hands out one `&mut V` per slot.
pub struct RawMut<'a, K: 'a, V: 'a> {
    nodes: NonNull<Node<K, V>>,
    len: usize,
    _mut: PhantomData<&'a mut [Node<K, V>]>,
}

impl<'a, K, V> RawMut<'a, K, V> {
    pub fn new(nodes: &'a mut [Node<K, V>]) -> Self {
        RawMut { len: nodes.len(), nodes: NonNull::from(nodes).cast(), _mut: PhantomData }
    }

    // Reads a link field in place without creating a reference to the node, whose value may
    // already be borrowed by a caller.
    fn link(&self, id: usize, f: fn(*const Node<K, V>) -> usize) -> usize {
        assert!(id < self.len);
        f(unsafe { self.nodes.as_ptr().add(id) })
    }
}

impl<'a, K, V> NodeSlice for RawMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&self, id: usize) -> usize {
        self.link(id, |node| unsafe { (*node).next })
    }

    fn prev(&self, id: usize) -> usize {
        self.link(id, |node| unsafe { (*node).prev })
    }

    fn item(&mut self, id: usize) -> Option<(&'a K, &'a mut V)> {
        assert!(id < self.len);
        let node: &'a mut Node<K, V> = unsafe { &mut *self.nodes.as_ptr().add(id) };
        node.entry.as_mut().map(|(k, v)| (&*k, v))
    }
}

unsafe impl<'a, K, V> Send for RawMut<'a, K, V> where K: Send, V: Send {}
unsafe impl<'a, K, V> Sync for RawMut<'a, K, V> where K: Sync, V: Sync {}

/// A double-ended iterator over the live slots between a front and a back position of the order
/// chain.
#[derive(Clone)]
pub struct Iter<N> where N: NodeSlice {
    nodes: N,
    front: usize,
    back: usize,
    size: usize,
}

impl<N> Iter<N> where N: NodeSlice {
    pub fn new(nodes: N, front: usize, back: usize, size: usize) -> Self {
        Iter { nodes: nodes, front: front, back: back, size: size }
    }
}

impl<N> Iterator for Iter<N> where N: NodeSlice {
    type Item = N::Item;

    fn next(&mut self) -> Option<N::Item> {
        if self.size == 0 { return None; }
        let id = self.front;
        self.front = self.nodes.next(id);
        self.size -= 1;
        self.nodes.item(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.size, Some(self.size)) }
}

impl<N> DoubleEndedIterator for Iter<N> where N: NodeSlice {
    fn next_back(&mut self) -> Option<N::Item> {
        if self.size == 0 { return None; }
        let id = self.back;
        self.back = self.nodes.prev(id);
        self.size -= 1;
        self.nodes.item(id)
    }
}

impl<N> ExactSizeIterator for Iter<N> where N: NodeSlice {}
