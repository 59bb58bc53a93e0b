//! Rule-agnostic traversal over the tree model.
//!
//! Two entry points:
//! - [`visit_all`] for full pre-order descent with pruning
//! - [`direct_children`] for looking one level into a block
//!
//! Neither allocates per node beyond the traversal stack, and both
//! yield nodes in source order.

use super::Node;

/// Pre-order, depth-first traversal of `root` and all its descendants.
///
/// `visitor` returns whether to descend into the node it was given.
/// Returning `false` skips that node's subtree; its following siblings
/// are still visited.
pub fn visit_all<'a, F>(root: &'a Node, mut visitor: F)
where
    F: FnMut(&'a Node) -> bool,
{
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if visitor(node) {
            // Reverse so the first child is popped first.
            stack.extend(node.children.iter().rev());
        }
    }
}

/// Immediate statements of a block. Empty for any other node kind.
pub fn direct_children(block: &Node) -> &[Node] {
    if block.is_block() {
        &block.children
    } else {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::tree::{LoopForm, NodeKind, SourcePosition};

    fn at(offset: usize) -> SourcePosition {
        SourcePosition::new(Arc::from("walk.go"), 1, offset + 1, offset)
    }

    fn other(grammar: &'static str, start: usize, end: usize, children: Vec<Node>) -> Node {
        Node::new(NodeKind::Other { grammar }, at(start), at(end), children)
    }

    /// root(0) -> [a(1) -> [a1(2), a2(3)], b(4) -> [b1(5)]]
    fn sample() -> Node {
        other(
            "root",
            0,
            100,
            vec![
                other(
                    "a",
                    1,
                    50,
                    vec![other("a1", 2, 10, vec![]), other("a2", 3, 20, vec![])],
                ),
                other("b", 4, 90, vec![other("b1", 5, 60, vec![])]),
            ],
        )
    }

    #[test]
    fn test_visit_all_is_preorder() {
        let tree = sample();
        let mut seen = Vec::new();
        visit_all(&tree, |n| {
            seen.push(n.label());
            true
        });
        assert_eq!(seen, vec!["root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn test_visit_all_prunes_subtree_only() {
        let tree = sample();
        let mut seen = Vec::new();
        visit_all(&tree, |n| {
            seen.push(n.label());
            n.label() != "a"
        });
        assert_eq!(seen, vec!["root", "a", "b", "b1"]);
    }

    #[test]
    fn test_direct_children_does_not_descend() {
        let body = Node::new(
            NodeKind::Block,
            at(0),
            at(40),
            vec![
                Node::new(NodeKind::DeferStmt, at(1), at(5), vec![]),
                other(
                    "if_statement",
                    6,
                    30,
                    vec![Node::new(
                        NodeKind::Block,
                        at(10),
                        at(30),
                        vec![Node::new(NodeKind::DeferStmt, at(11), at(20), vec![])],
                    )],
                ),
            ],
        );
        let kids = direct_children(&body);
        assert_eq!(kids.len(), 2);
        assert!(kids[0].is_defer());
        assert!(!kids[1].is_defer());
    }

    #[test]
    fn test_direct_children_of_non_block_is_empty() {
        let lp = Node::new(
            NodeKind::LoopStmt {
                form: LoopForm::Range,
            },
            at(0),
            at(10),
            vec![Node::new(NodeKind::Block, at(5), at(10), vec![])],
        );
        assert!(direct_children(&lp).is_empty());
    }
}
