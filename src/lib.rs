//! An ordered binary search tree with on-demand AVL rebalancing.

// Conventions used in comments:
// - The height of a node `x` is denoted `h(x)`; `h(missing) = 0` and a leaf
//   has height 1.
// - The balance factor of `x` is `h(left(x)) - h(right(x))`.
//
// The fundamental invariants of the tree are:
// 1. For every node, all keys in its left subtree are strictly less than its
//    key, and all keys in its right subtree are strictly greater.
// 2. Immediately after `rebalance` returns, every node's cached height
//    matches its subtree and every balance factor is in {-1, 0, 1}.
//
// Insert and remove do not maintain cached heights; new nodes start at
// height 1 and ancestors keep whatever value they had. Only `rebalance`
// (and the rotations it performs) recomputes them. Search, insert and
// remove never read heights, so staleness is harmless between passes.

use core::{cmp::Ordering, fmt};

mod debug;
mod iter;
#[cfg(any(test, feature = "model"))]
pub mod model;
#[cfg(test)]
mod tests;

pub use iter::{Iter, PostOrder, PreOrder, TraversalIter};

type Link<K> = Option<Box<Node<K>>>;

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    height: i32,
}

impl<K> Node<K> {
    fn new(key: K) -> Node<K> {
        Node {
            key,
            left: None,
            right: None,
            height: 1,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height_of(&self.left).max(height_of(&self.right));
    }

    fn balance(&self) -> i32 {
        height_of(&self.left) - height_of(&self.right)
    }
}

fn height_of<K>(link: &Link<K>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// A traversal order over the keys of a [`Bst`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Node before either subtree.
    PreOrder,
    /// Left subtree, node, right subtree; yields keys in ascending order.
    InOrder,
    /// Both subtrees before the node.
    PostOrder,
}

/// An ordered set of keys backed by a binary search tree.
///
/// Unlike a self-balancing tree, mutation never restructures the tree: the
/// shape is determined entirely by the order of insertions and removals, and
/// can degenerate into a chain. Calling [`rebalance`] converts the current
/// tree into an AVL-balanced equivalent in a single bottom-up pass.
///
/// [`rebalance`]: Bst::rebalance
pub struct Bst<K> {
    root: Link<K>,
    len: usize,
}

impl<K: Ord> Bst<K> {
    /// Returns a new empty tree.
    pub const fn new() -> Bst<K> {
        Bst { root: None, len: 0 }
    }

    /// Returns `true` if the tree contains no elements.
    pub const fn is_empty(&self) -> bool {
        let empty = self.len() == 0;

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == self.root.is_none());
        }

        empty
    }

    /// Returns the number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns the cached height of the tree, which is 0 when empty.
    ///
    /// Heights are only recomputed by [`rebalance`](Bst::rebalance); between
    /// structural operations the returned value may be stale.
    pub fn height(&self) -> i32 {
        height_of(&self.root)
    }

    /// Inserts `key` into the tree.
    ///
    /// Returns `true` if the key was not already present. Inserting a
    /// duplicate key leaves the tree untouched.
    ///
    /// This operation completes in time proportional to the depth of the
    /// tree, which is _O(n)_ in the worst case until the next
    /// [`rebalance`](Bst::rebalance).
    pub fn insert(&mut self, key: K) -> bool {
        let (root, inserted) = Self::insert_in(self.root.take(), key);
        self.root = Some(root);

        if inserted {
            self.len += 1;
        }

        inserted
    }

    // Inserts `key` into the subtree at `link` and returns the new subtree
    // root. Ancestor heights are left as-is; `rebalance` recomputes them.
    fn insert_in(link: Link<K>, key: K) -> (Box<Node<K>>, bool) {
        let Some(mut node) = link else {
            return (Box::new(Node::new(key)), true);
        };

        let inserted = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, inserted) = Self::insert_in(node.left.take(), key);
                node.left = Some(left);
                inserted
            }
            Ordering::Greater => {
                let (right, inserted) = Self::insert_in(node.right.take(), key);
                node.right = Some(right);
                inserted
            }
            Ordering::Equal => false,
        };

        (node, inserted)
    }

    /// Removes `key` from the tree, returning it if it was present.
    ///
    /// Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &K) -> Option<K> {
        let (root, removed) = Self::remove_in(self.root.take(), key);
        self.root = root;

        if removed.is_some() {
            self.len -= 1;
        }

        removed
    }

    fn remove_in(link: Link<K>, key: &K) -> (Link<K>, Option<K>) {
        let Some(mut node) = link else {
            return (None, None);
        };

        match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Self::remove_in(node.left.take(), key);
                node.left = left;
                (Some(node), removed)
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_in(node.right.take(), key);
                node.right = right;
                (Some(node), removed)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                // With at most one child, the matched node is unlinked and
                // its child (if any) takes its place.
                (None, right) => (right, Some(node.key)),
                (left, None) => (left, Some(node.key)),

                // With two children, the successor (the minimum of the right
                // subtree) is spliced out of its place and the matched node
                // is reused to hold its key. The physically detached node
                // never has a left child.
                (left, Some(right)) => {
                    let (right, successor) = Self::take_min(right);
                    node.left = left;
                    node.right = right;

                    let removed = core::mem::replace(&mut node.key, successor.key);
                    (Some(node), Some(removed))
                }
            },
        }
    }

    // Detaches the minimum node of the subtree at `node`, returning the
    // remaining subtree and the detached node with its children cleared.
    fn take_min(mut node: Box<Node<K>>) -> (Link<K>, Box<Node<K>>) {
        match node.left.take() {
            None => {
                let right = node.right.take();
                (right, node)
            }
            Some(left) => {
                let (left, min) = Self::take_min(left);
                node.left = left;
                (Some(node), min)
            }
        }
    }

    /// Returns a reference to the key equal to `key`, if present.
    pub fn get(&self, key: &K) -> Option<&K> {
        let mut opt_cur = self.root.as_deref();

        while let Some(cur) = opt_cur {
            match key.cmp(&cur.key) {
                Ordering::Less => opt_cur = cur.left.as_deref(),
                Ordering::Equal => return Some(&cur.key),
                Ordering::Greater => opt_cur = cur.right.as_deref(),
            }
        }

        None
    }

    /// Returns `true` if the tree contains `key`.
    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Returns the minimum key of the tree.
    pub fn first(&self) -> Option<&K> {
        let mut cur = self.root.as_deref()?;

        while let Some(left) = cur.left.as_deref() {
            cur = left;
        }

        Some(&cur.key)
    }

    /// Returns the maximum key of the tree.
    pub fn last(&self) -> Option<&K> {
        let mut cur = self.root.as_deref()?;

        while let Some(right) = cur.right.as_deref() {
            cur = right;
        }

        Some(&cur.key)
    }

    /// Restructures the tree to satisfy the AVL balance invariant.
    ///
    /// A bottom-up pass rebalances every subtree, recomputing cached
    /// heights along the way. The key sequence is preserved exactly; only
    /// the shape changes. Afterwards every node's balance factor is in
    /// `{-1, 0, 1}`, so the tree's depth is logarithmic in its length.
    ///
    /// Calling this twice without an intervening mutation leaves the tree
    /// unchanged after the first call.
    pub fn rebalance(&mut self) {
        self.root = self.root.take().map(Self::rebalance_in);
    }

    // Rebalances the subtree at `node` post-order: both children are fully
    // balanced with correct heights before this node is settled.
    fn rebalance_in(mut node: Box<Node<K>>) -> Box<Node<K>> {
        node.left = node.left.take().map(Self::rebalance_in);
        node.right = node.right.take().map(Self::rebalance_in);
        node.update_height();

        Self::settle(node)
    }

    // Restores the AVL invariant at `node`, whose children are balanced
    // with correct heights but whose own balance factor may be arbitrarily
    // large (a skewed chain reaches the full subtree height). A rotation
    // fixes this node but leaves the excess imbalance, strictly smaller, in
    // the demoted child, so that child is settled recursively before this
    // node is re-checked.
    fn settle(mut node: Box<Node<K>>) -> Box<Node<K>> {
        loop {
            let balance = node.balance();

            if balance > 1 {
                // Left-heavy. A taller left-right grandchild is first
                // rotated into the left-left position.
                let left = node
                    .left
                    .as_deref()
                    .expect("left-heavy node must have a left child");

                if height_of(&left.right) > height_of(&left.left) {
                    node.left = node.left.take().map(Self::rotate_left);
                }

                node = Self::rotate_right(node);
                node.right = node.right.take().map(Self::settle);
            } else if balance < -1 {
                let right = node
                    .right
                    .as_deref()
                    .expect("right-heavy node must have a right child");

                if height_of(&right.left) > height_of(&right.right) {
                    node.right = node.right.take().map(Self::rotate_right);
                }

                node = Self::rotate_left(node);
                node.left = node.left.take().map(Self::settle);
            } else {
                return node;
            }

            node.update_height();
        }
    }

    // Rotates the subtree at `y` to the right and returns the new root,
    // `y`'s left child.
    //
    // Heights are recomputed for the two pivots only, demoted node first:
    // `y`'s new height feeds into the new root's.
    fn rotate_right(mut y: Box<Node<K>>) -> Box<Node<K>> {
        let mut x = y
            .left
            .take()
            .expect("right rotation requires a left child");

        y.left = x.right.take();
        y.update_height();

        x.right = Some(y);
        x.update_height();

        x
    }

    // Mirror image of `rotate_right`.
    fn rotate_left(mut x: Box<Node<K>>) -> Box<Node<K>> {
        let mut y = x
            .right
            .take()
            .expect("left rotation requires a right child");

        x.right = y.left.take();
        x.update_height();

        y.left = Some(x);
        y.update_height();

        y
    }

    /// Returns an in-order iterator over the keys of the tree.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Returns a pre-order iterator over the keys of the tree.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(self)
    }

    /// Returns a post-order iterator over the keys of the tree.
    pub fn post_order(&self) -> PostOrder<'_, K> {
        PostOrder::new(self)
    }

    /// Returns an iterator over the keys of the tree in the given order.
    pub fn traverse(&self, order: Traversal) -> TraversalIter<'_, K> {
        TraversalIter::new(self, order)
    }

    /// Returns a read-only view of the root node, if any.
    ///
    /// The view exposes each node's key and children without any mutation
    /// capability, which is sufficient for a renderer to discover the whole
    /// shape of the tree.
    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.as_deref().map(|node| NodeRef { node })
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        if let Some(root) = self.root.as_deref() {
            Self::assert_ordered(root, None, None);
        }

        assert_eq!(self.len, self.iter().count());
    }

    // Ensures every key in the subtree at `node` lies strictly within
    // `(min, max)`.
    fn assert_ordered<'a>(node: &'a Node<K>, min: Option<&'a K>, max: Option<&'a K>) {
        if let Some(min) = min {
            assert!(*min < node.key);
        }

        if let Some(max) = max {
            assert!(node.key < *max);
        }

        if let Some(left) = node.left.as_deref() {
            Self::assert_ordered(left, min, Some(&node.key));
        }

        if let Some(right) = node.right.as_deref() {
            Self::assert_ordered(right, Some(&node.key), max);
        }
    }

    /// Asserts that every cached height matches its subtree and that every
    /// balance factor is in `{-1, 0, 1}`.
    ///
    /// Only meaningful immediately after [`rebalance`](Bst::rebalance);
    /// plain mutation leaves heights stale by design.
    #[doc(hidden)]
    pub fn assert_balanced(&self) {
        if let Some(root) = self.root.as_deref() {
            Self::assert_balanced_at(root);
        }
    }

    // Returns the recomputed height of the subtree at `node`.
    fn assert_balanced_at(node: &Node<K>) -> i32 {
        let left = node.left.as_deref().map_or(0, Self::assert_balanced_at);
        let right = node.right.as_deref().map_or(0, Self::assert_balanced_at);

        assert!((left - right).abs() <= 1);
        assert_eq!(node.height, 1 + left.max(right));

        node.height
    }
}

impl<K> Bst<K> {
    /// Clears the tree, removing all elements.
    pub fn clear(&mut self) {
        // Unlink children before dropping each node so that no drop recurses
        // through a long chain.
        let mut stack = Vec::new();
        stack.extend(self.root.take());

        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }

        self.len = 0;
    }
}

impl<K: Ord> Default for Bst<K> {
    fn default() -> Bst<K> {
        Bst::new()
    }
}

impl<K> Drop for Bst<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K: Ord> FromIterator<K> for Bst<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Bst<K> {
        let mut tree = Bst::new();

        for key in iter {
            tree.insert(key);
        }

        tree
    }
}

impl<'tree, K: Ord> IntoIterator for &'tree Bst<K> {
    type Item = &'tree K;
    type IntoIter = Iter<'tree, K>;

    fn into_iter(self) -> Iter<'tree, K> {
        self.iter()
    }
}

/// A read-only view of a single tree node.
///
/// Obtained from [`Bst::root`]; descending through [`left`](NodeRef::left)
/// and [`right`](NodeRef::right) visits the whole tree.
#[derive(Clone, Copy)]
pub struct NodeRef<'tree, K> {
    node: &'tree Node<K>,
}

impl<'tree, K> NodeRef<'tree, K> {
    /// Returns the node's key.
    pub fn key(&self) -> &'tree K {
        &self.node.key
    }

    /// Returns a view of the node's left child, if any.
    pub fn left(&self) -> Option<NodeRef<'tree, K>> {
        self.node.left.as_deref().map(|node| NodeRef { node })
    }

    /// Returns a view of the node's right child, if any.
    pub fn right(&self) -> Option<NodeRef<'tree, K>> {
        self.node.right.as_deref().map(|node| NodeRef { node })
    }

    /// Returns the node's cached height.
    pub fn height(&self) -> i32 {
        self.node.height
    }
}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
