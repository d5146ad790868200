use crate::ast::{NodeKind, Position};

/// A node of the query tree.
///
/// The tree is read-only once the parser hands it out. Every node knows the
/// grammar rule it came from, where it starts, and its normalized source text:
/// the node's tokens concatenated without whitespace, except for one space
/// between two adjacent word-like tokens (names, keywords, numbers, strings).
///
/// # Example
/// ```text
/// count( DISTINCT n )   →  "count(DISTINCT n)"
/// n.name + 1            →  "n.name+1"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub text: String,
    pub position: Position,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: NodeKind, text: String, position: Position, children: Vec<SyntaxNode>) -> Self {
        SyntaxNode {
            kind,
            text,
            position,
            children,
        }
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// First direct child of the given kind.
    pub fn child(&self, kind: NodeKind) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All direct children of the given kind, in document order.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn first_child(&self) -> Option<&SyntaxNode> {
        self.children.first()
    }
}
