use bst_avl::{Bst, NodeRef, Traversal};

// Renders the tree sideways, right subtree above the node and left below,
// the way the tree's console driver displays it.
fn print_vertical<K: std::fmt::Display>(node: NodeRef<'_, K>, level: usize, branch: char) {
    if let Some(right) = node.right() {
        print_vertical(right, level + 1, '/');
    }

    println!("{}{}-- {}", "   ".repeat(level), branch, node.key());

    if let Some(left) = node.left() {
        print_vertical(left, level + 1, '\\');
    }
}

fn main() {
    let mut tree: Bst<i32> = Bst::new();

    for key in [5, 3, 8, 1, 4, 7, 9] {
        tree.insert(key);
    }
    tree.assert_invariants();

    for order in [Traversal::PreOrder, Traversal::InOrder, Traversal::PostOrder] {
        println!(
            "{order:?}: {:?}",
            tree.traverse(order).collect::<Vec<_>>()
        );
    }

    println!("min: {:?}, max: {:?}", tree.first(), tree.last());

    tree.remove(&5);
    tree.assert_invariants();
    println!("after removing 5: {:?}", tree.iter().collect::<Vec<_>>());

    // A strictly increasing insert sequence degenerates into a chain;
    // rebalancing restores logarithmic depth.
    let mut chain: Bst<i32> = (1..=10).collect();

    println!("\nchain of 1..=10:");
    if let Some(root) = chain.root() {
        print_vertical(root, 0, ' ');
    }

    chain.rebalance();
    chain.assert_balanced();

    println!("\nafter rebalance (height {}):", chain.height());
    if let Some(root) = chain.root() {
        print_vertical(root, 0, ' ');
    }

    let mut dot = String::new();
    chain
        .dotgraph("chain", &mut dot)
        .expect("writing to a String cannot fail");
    println!("\n{dot}");
}
