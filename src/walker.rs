//! Prunable depth-first traversal over the query tree.
//!
//! Every other pass is built on [`walk`]: a visit function decides per node
//! whether to [`Visit::Descend`] into its children or [`Visit::Prune`] the
//! subtree, and the returned iterator yields each reached node in pre-order,
//! document order. Callers filter and collect from the iterator instead of
//! mutating captured state.
//!
//! The traversal keeps its own stack on the heap, so deeply nested queries do
//! not grow the native call stack.
//!
//! ```
//! use cypher_scope::ast::NodeKind;
//! use cypher_scope::parser::parse;
//! use cypher_scope::walker::{walk, Visit};
//!
//! let tree = parse("MATCH (a)-->(b) RETURN a").unwrap();
//! let patterns: Vec<_> = walk(&tree, |node| match node.kind {
//!     NodeKind::NodePattern => Visit::Prune,
//!     _ => Visit::Descend,
//! })
//! .filter(|node| node.is(NodeKind::NodePattern))
//! .map(|node| node.text.as_str())
//! .collect();
//!
//! assert_eq!(patterns, vec!["(a)", "(b)"]);
//! ```

use crate::ast::{NodeKind, SyntaxNode};

/// Continuation decision for a visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Continue into the node's children.
    Descend,
    /// Skip the node's subtree. The node itself is still yielded.
    Prune,
}

/// Lazy pre-order traversal returned by [`walk`].
pub struct Walk<'a, F> {
    stack: Vec<&'a SyntaxNode>,
    visit: F,
}

impl<'a, F> Iterator for Walk<'a, F>
where
    F: Fn(&SyntaxNode) -> Visit,
{
    type Item = &'a SyntaxNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if (self.visit)(node) == Visit::Descend {
            // Reversed so the leftmost child is popped first.
            self.stack.extend(node.children.iter().rev());
        }
        Some(node)
    }
}

/// Walks `root` and everything below it that `visit` lets the walk reach.
pub fn walk<F>(root: &SyntaxNode, visit: F) -> Walk<'_, F>
where
    F: Fn(&SyntaxNode) -> Visit,
{
    Walk {
        stack: vec![root],
        visit,
    }
}

/// Every node of the tree, in pre-order.
pub fn descendants(root: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    walk(root, |_| Visit::Descend)
}

/// First node of the given kind, in document order.
pub fn find_kind(root: &SyntaxNode, kind: NodeKind) -> Option<&SyntaxNode> {
    descendants(root).find(|node| node.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;
    use pretty_assertions::assert_eq;

    fn leaf(kind: NodeKind, text: &str) -> SyntaxNode {
        SyntaxNode::new(kind, text.to_string(), Position::new(1, 0), vec![])
    }

    fn branch(kind: NodeKind, text: &str, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(kind, text.to_string(), Position::new(1, 0), children)
    }

    fn sample() -> SyntaxNode {
        branch(
            NodeKind::Pattern,
            "root",
            vec![
                branch(
                    NodeKind::NodePattern,
                    "left",
                    vec![leaf(NodeKind::Variable, "a"), leaf(NodeKind::Variable, "b")],
                ),
                leaf(NodeKind::Variable, "c"),
            ],
        )
    }

    #[test]
    fn test_pre_order_document_order() {
        let tree = sample();
        let texts: Vec<_> = descendants(&tree).map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["root", "left", "a", "b", "c"]);
    }

    #[test]
    fn test_prune_skips_subtree_but_yields_node() {
        let tree = sample();
        let texts: Vec<_> = walk(&tree, |n| match n.kind {
            NodeKind::NodePattern => Visit::Prune,
            _ => Visit::Descend,
        })
        .map(|n| n.text.as_str())
        .collect();
        assert_eq!(texts, vec!["root", "left", "c"]);
    }

    #[test]
    fn test_leaf_root() {
        let tree = leaf(NodeKind::Variable, "x");
        assert_eq!(descendants(&tree).count(), 1);
    }

    #[test]
    fn test_walk_is_restartable() {
        let tree = sample();
        let first: Vec<_> = descendants(&tree).map(|n| n.text.clone()).collect();
        let second: Vec<_> = descendants(&tree).map(|n| n.text.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_deep_tree_does_not_recurse() {
        let mut tree = leaf(NodeKind::Variable, "bottom");
        for _ in 0..100_000 {
            tree = branch(NodeKind::ParenthesizedExpression, "", vec![tree]);
        }
        assert_eq!(descendants(&tree).count(), 100_001);
        assert_eq!(find_kind(&tree, NodeKind::Variable).map(|n| n.text.as_str()), Some("bottom"));

        // Dropping a tree this deep recurses in the compiler-generated drop glue.
        let mut node = tree;
        while let Some(child) = node.children.pop() {
            node = child;
        }
    }
}
