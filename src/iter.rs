use core::iter::FusedIterator;

use crate::{Bst, Node, Traversal};

/// An in-order iterator over the keys of a [`Bst`].
///
/// Keys are yielded in strictly ascending order.
pub struct Iter<'tree, K> {
    // Left spine of the subtree whose minimum is up next; popping a node
    // yields it, then its right subtree's spine is pushed.
    stack: Vec<&'tree Node<K>>,
    remaining: usize,
}

impl<'tree, K> Iter<'tree, K> {
    pub(crate) fn new(tree: &'tree Bst<K>) -> Self {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: tree.len,
        };

        iter.push_left_spine(tree.root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut opt_cur: Option<&'tree Node<K>>) {
        while let Some(cur) = opt_cur {
            self.stack.push(cur);
            opt_cur = cur.left.as_deref();
        }
    }
}

impl<'tree, K> Iterator for Iter<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());

        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> FusedIterator for Iter<'_, K> {}

/// A pre-order iterator over the keys of a [`Bst`].
pub struct PreOrder<'tree, K> {
    stack: Vec<&'tree Node<K>>,
    remaining: usize,
}

impl<'tree, K> PreOrder<'tree, K> {
    pub(crate) fn new(tree: &'tree Bst<K>) -> Self {
        PreOrder {
            stack: tree.root.as_deref().into_iter().collect(),
            remaining: tree.len,
        }
    }
}

impl<'tree, K> Iterator for PreOrder<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Right below left so that the left subtree is exhausted first.
        if let Some(right) = node.right.as_deref() {
            self.stack.push(right);
        }

        if let Some(left) = node.left.as_deref() {
            self.stack.push(left);
        }

        self.remaining -= 1;
        Some(&node.key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PreOrder<'_, K> {}
impl<K> FusedIterator for PreOrder<'_, K> {}

/// A post-order iterator over the keys of a [`Bst`].
pub struct PostOrder<'tree, K> {
    // The flag records whether the node's children have already been pushed;
    // a node is yielded the second time it is popped.
    stack: Vec<(&'tree Node<K>, bool)>,
    remaining: usize,
}

impl<'tree, K> PostOrder<'tree, K> {
    pub(crate) fn new(tree: &'tree Bst<K>) -> Self {
        let stack = tree
            .root
            .as_deref()
            .map(|root| (root, false))
            .into_iter()
            .collect();

        PostOrder {
            stack,
            remaining: tree.len,
        }
    }
}

impl<'tree, K> Iterator for PostOrder<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                self.remaining -= 1;
                return Some(&node.key);
            }

            self.stack.push((node, true));

            if let Some(right) = node.right.as_deref() {
                self.stack.push((right, false));
            }

            if let Some(left) = node.left.as_deref() {
                self.stack.push((left, false));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for PostOrder<'_, K> {}
impl<K> FusedIterator for PostOrder<'_, K> {}

/// An iterator over the keys of a [`Bst`] in a caller-selected order.
///
/// Returned by [`Bst::traverse`].
pub enum TraversalIter<'tree, K> {
    #[doc(hidden)]
    Pre(PreOrder<'tree, K>),
    #[doc(hidden)]
    In(Iter<'tree, K>),
    #[doc(hidden)]
    Post(PostOrder<'tree, K>),
}

impl<'tree, K> TraversalIter<'tree, K> {
    pub(crate) fn new(tree: &'tree Bst<K>, order: Traversal) -> Self {
        match order {
            Traversal::PreOrder => TraversalIter::Pre(PreOrder::new(tree)),
            Traversal::InOrder => TraversalIter::In(Iter::new(tree)),
            Traversal::PostOrder => TraversalIter::Post(PostOrder::new(tree)),
        }
    }
}

impl<'tree, K> Iterator for TraversalIter<'tree, K> {
    type Item = &'tree K;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            TraversalIter::Pre(iter) => iter.next(),
            TraversalIter::In(iter) => iter.next(),
            TraversalIter::Post(iter) => iter.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            TraversalIter::Pre(iter) => iter.size_hint(),
            TraversalIter::In(iter) => iter.size_hint(),
            TraversalIter::Post(iter) => iter.size_hint(),
        }
    }
}

impl<K> ExactSizeIterator for TraversalIter<'_, K> {}
impl<K> FusedIterator for TraversalIter<'_, K> {}
