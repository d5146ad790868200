//! Clause-by-clause scope evolution over one query.
//!
//! [`analyze`] is the entry point: it rejects unsupported constructs, finds
//! the query below the statement wrappers and feeds its clauses, in source
//! order, through a single [`Scope`]. Chained `WITH ... <rest>` queries
//! recurse with the same scope.
//!
//! | Clause              | Checked against the scope         | Scope afterwards            |
//! |---------------------|-----------------------------------|-----------------------------|
//! | `MATCH`             | nothing                           | + pattern variables         |
//! | `UNWIND`            | source expression                 | + target variable           |
//! | `CALL ... YIELD`    | procedure arguments               | + yielded variables         |
//! | `CREATE`            | nothing                           | + created variables         |
//! | `SET` / `DELETE` / `REMOVE` | every reference           | unchanged                   |
//! | `WITH` / `RETURN`   | item expressions, then modifiers  | exactly the projected names |

use tracing::{debug, debug_span, trace};

use crate::{
    ast::{NodeKind, SyntaxNode},
    diagnostics::{AnalysisError, Construct, Diagnostic},
    extract::{defining, projection_inputs, projects_all, referencing},
    scope::Scope,
    walker::find_kind,
};

/// Outcome of analyzing one supported query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Undefined-variable diagnostics in document order
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Clause<'a> {
    Match(&'a SyntaxNode),
    Unwind(&'a SyntaxNode),
    Call(&'a SyntaxNode),
    Create(&'a SyntaxNode),
    Update(&'a SyntaxNode),
    Projection(&'a SyntaxNode),
    Continuation(&'a SyntaxNode),
}

impl<'a> Clause<'a> {
    fn classify(node: &'a SyntaxNode) -> Option<Self> {
        match node.kind {
            NodeKind::ReadingClause | NodeKind::UpdatingClause => {
                node.first_child().and_then(Clause::classify)
            }
            NodeKind::Match => Some(Clause::Match(node)),
            NodeKind::Unwind => Some(Clause::Unwind(node)),
            NodeKind::InQueryCall => Some(Clause::Call(node)),
            NodeKind::Create => Some(Clause::Create(node)),
            NodeKind::Set | NodeKind::Delete | NodeKind::Remove => Some(Clause::Update(node)),
            NodeKind::With | NodeKind::Return => Some(Clause::Projection(node)),
            NodeKind::SinglePartQuery | NodeKind::MultiPartQuery => {
                Some(Clause::Continuation(node))
            }
            _ => None,
        }
    }
}

/// Fails on the first `MERGE`, `UNION` or `WHERE` anywhere in the tree.
pub fn check_supported(root: &SyntaxNode) -> Result<(), AnalysisError> {
    let unsupported = [
        (NodeKind::Merge, Construct::Merge),
        (NodeKind::Union, Construct::Union),
        (NodeKind::Where, Construct::Filter),
    ];

    for (kind, construct) in unsupported {
        if let Some(node) = find_kind(root, kind) {
            debug!(%construct, position = %node.position, "rejecting query");
            return Err(AnalysisError::Unsupported {
                construct,
                position: node.position,
            });
        }
    }
    Ok(())
}

/// Strips the statement wrappers down to the query to process.
fn top_level_query(root: &SyntaxNode) -> Result<&SyntaxNode, AnalysisError> {
    let mut node = root;
    loop {
        match node.kind {
            NodeKind::Cypher
            | NodeKind::Statement
            | NodeKind::Query
            | NodeKind::RegularQuery
            | NodeKind::SingleQuery => match node.first_child() {
                Some(child) => node = child,
                None => break,
            },
            NodeKind::SinglePartQuery | NodeKind::MultiPartQuery | NodeKind::StandaloneCall => {
                return Ok(node);
            }
            _ => break,
        }
    }

    Err(AnalysisError::Unsupported {
        construct: Construct::StandaloneShape,
        position: node.position,
    })
}

/// Analyzes a whole query tree.
///
/// Returns every undefined-variable diagnostic, or an error without any
/// diagnostics when the query uses a construct the resolver does not model.
pub fn analyze(root: &SyntaxNode) -> Result<Analysis, AnalysisError> {
    let _span = debug_span!("analyze").entered();

    check_supported(root)?;
    let query = top_level_query(root)?;

    let mut scope = Scope::new();
    let mut diagnostics = Vec::new();
    let errors = if query.is(NodeKind::StandaloneCall) {
        process_standalone_call(&scope, query, &mut diagnostics)
    } else {
        process_query(&mut scope, query, &mut diagnostics)
    };

    debug!(errors, "analysis finished");
    Ok(Analysis { diagnostics })
}

/// Processes the clauses of `query` in order, returning the number of
/// undefined references found.
pub fn process_query(
    scope: &mut Scope,
    query: &SyntaxNode,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let _span = debug_span!("query", position = %query.position).entered();
    let mut errors = 0;

    for child in &query.children {
        let Some(clause) = Clause::classify(child) else {
            trace!(kind = ?child.kind, "not a clause");
            continue;
        };

        errors += match clause {
            Clause::Match(node) | Clause::Create(node) => {
                scope.add(defining(node));
                0
            }
            Clause::Unwind(node) => {
                let references = node
                    .child(NodeKind::Expression)
                    .map(|source| referencing(source, scope))
                    .unwrap_or_default();
                let found = scope.check(&references, diagnostics);
                scope.add(defining(node));
                found
            }
            Clause::Call(node) => {
                let references = node
                    .child(NodeKind::ProcedureInvocation)
                    .map(|invocation| referencing(invocation, scope))
                    .unwrap_or_default();
                let found = scope.check(&references, diagnostics);
                if let Some(items) = node.child(NodeKind::YieldItems) {
                    scope.add(defining(items));
                }
                found
            }
            Clause::Update(node) => {
                let references = referencing(node, scope);
                scope.check(&references, diagnostics)
            }
            Clause::Projection(node) => process_projection(scope, node, diagnostics),
            Clause::Continuation(node) => process_query(scope, node, diagnostics),
        };

        debug!(
            clause = ?child.kind,
            errors,
            scope = ?scope.names().collect::<Vec<_>>(),
            "processed clause"
        );
    }

    errors
}

/// `WITH` / `RETURN`: item expressions resolve against the bindings before
/// the clause; afterwards only the projected columns remain bound.
fn process_projection(
    scope: &mut Scope,
    clause: &SyntaxNode,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let Some(body) = clause.child(NodeKind::ProjectionBody) else {
        return 0;
    };
    let items = body.child(NodeKind::ProjectionItems);

    let inputs = projection_inputs(body, scope);
    let mut errors = scope.check(&inputs, diagnostics);

    let outputs = items.map(defining).unwrap_or_default();
    let keep_all = items.is_some_and(projects_all);

    // ORDER BY, SKIP and LIMIT may use both the incoming bindings and the
    // new columns.
    let mut visible = scope.clone();
    visible.add(outputs.iter().cloned());
    for modifier in body
        .children
        .iter()
        .filter(|c| matches!(c.kind, NodeKind::Order | NodeKind::Skip | NodeKind::Limit))
    {
        let references = referencing(modifier, &visible);
        errors += visible.check(&references, diagnostics);
    }

    if !keep_all {
        scope.clear();
    }
    scope.add(outputs);
    errors
}

/// A standalone `CALL` has no prior bindings; only its arguments can refer
/// to anything.
fn process_standalone_call(
    scope: &Scope,
    call: &SyntaxNode,
    diagnostics: &mut Vec<Diagnostic>,
) -> usize {
    let references = call
        .child(NodeKind::ProcedureInvocation)
        .map(|invocation| referencing(invocation, scope))
        .unwrap_or_default();
    scope.check(&references, diagnostics)
}
