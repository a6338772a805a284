use core::fmt::{self, Write};
use std::collections::VecDeque;

use crate::{Bst, NodeRef};

impl<K: Ord + fmt::Debug> fmt::Debug for Bst<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord + fmt::Display> Bst<K> {
    /// Writes a Graphviz rendering of the tree to `w`.
    ///
    /// Nodes are labeled `key:height` and grouped by depth; missing children
    /// are drawn as points so that left and right are distinguishable.
    pub fn dotgraph<W: fmt::Write>(&self, name: &str, mut w: W) -> fmt::Result {
        let root = match self.root() {
            Some(root) => root,
            None => return write!(w, "digraph \"graph-{name}\" {{}}"),
        };

        enum Item<'tree, K> {
            Node(NodeRef<'tree, K>),
            Missing(u32),
        }

        let mut queue = VecDeque::new();
        queue.push_back(Item::Node(root));

        write!(
            w,
            "digraph \"graph-{name}\" {{\n subgraph \"subgraph-{name}\" {{"
        )?;

        let mut missing = 0;
        let mut links = String::new();

        loop {
            let remaining = queue.len();
            if remaining == 0 {
                break;
            }

            write!(w, "{{rank=same; ")?;

            for _depth_node in 0..remaining {
                let node = match queue.pop_front().unwrap() {
                    Item::Node(node) => node,
                    Item::Missing(id) => {
                        write!(w, "\"graph{name}-missing{id}\" [shape=point]; ")?;
                        continue;
                    }
                };

                let key = node.key();
                let height = node.height();
                write!(w, "\"graph{name}-{key}\" [label=\"{key}:{height}\"]; ")?;

                for child in [node.left(), node.right()] {
                    match child {
                        Some(child) => {
                            let child_key = child.key();

                            queue.push_back(Item::Node(child));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-{child_key}\";"
                            )?;
                        }
                        None => {
                            queue.push_back(Item::Missing(missing));
                            writeln!(
                                links,
                                "\"graph{name}-{key}\" -> \"graph{name}-missing{missing}\";"
                            )?;
                            missing += 1;
                        }
                    }
                }
            }

            writeln!(w, "}}")?;
        }

        w.write_str(&links)?;

        w.write_str(" }\n}")
    }
}
