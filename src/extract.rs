//! Defining and referencing variable occurrences.
//!
//! Both extractions are filters over [`walk`]. Results keep document order,
//! which only matters for the order diagnostics are reported in.

use crate::{
    ast::{NodeKind, SyntaxNode},
    scope::{Scope, Variable},
    walker::{Visit, walk},
};

/// Nodes that introduce a name. The walk does not look inside them.
fn is_binding_site(node: &SyntaxNode) -> bool {
    match node.kind {
        NodeKind::ProjectionItem
        | NodeKind::Unwind
        | NodeKind::YieldItem
        | NodeKind::NodePattern
        | NodeKind::RelationshipDetail
        | NodeKind::Variable => true,
        kind => kind.is_expression(),
    }
}

fn bound_by(node: &SyntaxNode) -> Option<Variable> {
    match node.kind {
        // `expr AS alias` binds the alias; a bare `expr` becomes a column
        // named by its own text.
        NodeKind::ProjectionItem => node
            .child(NodeKind::Variable)
            .or_else(|| node.child(NodeKind::Expression))
            .map(Variable::from),
        NodeKind::Unwind
        | NodeKind::YieldItem
        | NodeKind::NodePattern
        | NodeKind::RelationshipDetail => node.child(NodeKind::Variable).map(Variable::from),
        // Only reachable outside expressions, e.g. a path variable `p = (a)-->(b)`.
        NodeKind::Variable => Some(Variable::from(node)),
        _ => None,
    }
}

/// Variables introduced by `node`: projection outputs, unwind and yield
/// targets, node and relationship pattern variables, and path variables.
pub fn defining(node: &SyntaxNode) -> Vec<Variable> {
    walk(node, |n| {
        if is_binding_site(n) {
            Visit::Prune
        } else {
            Visit::Descend
        }
    })
    .filter_map(bound_by)
    .collect()
}

/// A variable atom, or an expression whose full text is a live column name.
fn is_reference(node: &SyntaxNode, scope: &Scope) -> bool {
    node.is(NodeKind::Variable) || (node.kind.is_expression() && scope.contains(&node.text))
}

/// Variables `node` reads, resolved against `scope` for column short-circuits.
///
/// An expression whose text names a binding in `scope` (for example
/// `count(n)` after `WITH count(n)`) is a single reference to that column;
/// its subtree is not searched. Projection aliases, unwind targets and yield
/// items are binding sites and never count as references.
pub fn referencing(node: &SyntaxNode, scope: &Scope) -> Vec<Variable> {
    let sites = walk(node, |n| match n.kind {
        NodeKind::ProjectionItem | NodeKind::Unwind | NodeKind::YieldItem => Visit::Prune,
        _ if is_reference(n, scope) => Visit::Prune,
        _ => Visit::Descend,
    });

    let mut references = Vec::new();
    for site in sites {
        match site.kind {
            NodeKind::ProjectionItem | NodeKind::Unwind => {
                if let Some(expression) = site.child(NodeKind::Expression) {
                    references.extend(referencing(expression, scope));
                }
            }
            NodeKind::YieldItem => {}
            _ if is_reference(site, scope) => references.push(Variable::from(site)),
            _ => {}
        }
    }
    references
}

/// References made by a projection's item expressions. Aliases are skipped.
pub fn projection_inputs(body: &SyntaxNode, scope: &Scope) -> Vec<Variable> {
    body.child(NodeKind::ProjectionItems)
        .map(|items| referencing(items, scope))
        .unwrap_or_default()
}

/// Whether a projection's items start with `*`, keeping every binding.
pub fn projects_all(items: &SyntaxNode) -> bool {
    items.is(NodeKind::ProjectionItems) && items.text.starts_with('*')
}
