//! AVL rotations and height bookkeeping.

use super::node::{Dir, Left, Link, Right, Tree};

impl<K, V> Tree<K, V> {
    pub(crate) fn height(&self, link: Link) -> usize {
        link.map_or(0, |id| self.nodes[id].height)
    }

    fn update_height(&mut self, id: usize) {
        let left = self.height(self.nodes[id].left);
        let right = self.height(self.nodes[id].right);
        self.nodes[id].height = 1 + left.max(right);
    }

    /// Returns `height(left) - height(right)`.
    pub(crate) fn balance_factor(&self, id: usize) -> isize {
        self.height(self.nodes[id].left) as isize - self.height(self.nodes[id].right) as isize
    }

    // Lifts the `D` child of `danger` into its place, returning the new subtree root. Only the
    // two nodes whose subtrees change have their heights recomputed.
    fn rotate<D>(&mut self, danger: usize) -> usize where D: Dir {
        let pivot = match D::child(&self.nodes[danger]) {
            Some(pivot) => pivot,
            None => return danger,
        };

        log::trace!("lifting {} child {} over node {}", D::NAME, pivot, danger);

        let inner = D::Opposite::child(&self.nodes[pivot]);
        *D::child_mut(&mut self.nodes[danger]) = inner;
        *D::Opposite::child_mut(&mut self.nodes[pivot]) = Some(danger);

        self.update_height(danger);
        self.update_height(pivot);
        pivot
    }

    /// Single rotation for a node whose left child's left subtree is too tall.
    pub(crate) fn rotate_left_left(&mut self, danger: usize) -> usize {
        self.rotate::<Left>(danger)
    }

    /// Single rotation for a node whose right child's right subtree is too tall.
    pub(crate) fn rotate_right_right(&mut self, danger: usize) -> usize {
        self.rotate::<Right>(danger)
    }

    /// Double rotation for a node whose left child's right subtree is too tall.
    pub(crate) fn rotate_left_right(&mut self, danger: usize) -> usize {
        if let Some(left) = self.nodes[danger].left {
            self.nodes[danger].left = Some(self.rotate_right_right(left));
        }
        self.rotate_left_left(danger)
    }

    /// Double rotation for a node whose right child's left subtree is too tall.
    pub(crate) fn rotate_right_left(&mut self, danger: usize) -> usize {
        if let Some(right) = self.nodes[danger].right {
            self.nodes[danger].right = Some(self.rotate_left_left(right));
        }
        self.rotate_right_right(danger)
    }

    /// Recomputes the height of `id` and restores its balance, returning the root of the
    /// rebalanced subtree.
    ///
    /// A heavy child leaning towards the outside (or level, which only happens after a removal)
    /// takes a single rotation; one leaning towards the inside takes a double rotation.
    pub(crate) fn rebalance(&mut self, id: usize) -> usize {
        self.update_height(id);

        match self.balance_factor(id) {
            2 => match self.nodes[id].left {
                Some(left) if self.balance_factor(left) * Left::BIAS < 0 =>
                    self.rotate_left_right(id),
                _ => self.rotate_left_left(id),
            },
            -2 => match self.nodes[id].right {
                Some(right) if self.balance_factor(right) * Right::BIAS < 0 =>
                    self.rotate_right_left(id),
                _ => self.rotate_right_right(id),
            },
            _ => id,
        }
    }

    /// Rebalances `id` after one of its subtrees shrank, returning the new subtree root and
    /// whether the subtree as a whole is now shorter.
    pub(crate) fn rebalance_shrunk(&mut self, id: usize) -> (usize, bool) {
        let height = self.nodes[id].height;
        let root = self.rebalance(id);
        (root, self.nodes[root].height < height)
    }
}

#[cfg(test)]
mod test {
    use compare::natural;
    use crate::node::{self, Tree};

    fn tree(keys: &[u32]) -> Tree<u32, ()> {
        let mut tree = Tree::new();
        for &key in keys { node::insert(&mut tree, &natural(), key, ()); }
        tree
    }

    fn shape(tree: &Tree<u32, ()>, link: node::Link) -> String {
        match link {
            None => ".".to_string(),
            Some(id) => format!("({} {} {})", shape(tree, tree.nodes[id].left), tree.key(id),
                                shape(tree, tree.nodes[id].right)),
        }
    }

    #[test]
    fn left_left() {
        let tree = tree(&[3, 2, 1]);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 (. 3 .))");
        assert_eq!(tree.height(tree.root), 2);
    }

    #[test]
    fn right_right() {
        let tree = tree(&[1, 2, 3]);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 (. 3 .))");
    }

    #[test]
    fn left_right() {
        let tree = tree(&[3, 1, 2]);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 (. 3 .))");
    }

    #[test]
    fn right_left() {
        let tree = tree(&[1, 3, 2]);
        assert_eq!(shape(&tree, tree.root), "((. 1 .) 2 (. 3 .))");
    }

    #[test]
    fn rotation_preserves_order_chain() {
        let tree = tree(&[10, 20, 30, 40, 50, 25]);
        assert_eq!(shape(&tree, tree.root),
                   "(((. 10 .) 20 (. 25 .)) 30 (. 40 (. 50 .)))");
        assert!(tree.check(&natural()).is_ok());
    }

    #[test]
    fn balance_factor_of_leaf_is_zero() {
        let tree = tree(&[1]);
        assert_eq!(tree.balance_factor(tree.root.unwrap()), 0);
    }
}
