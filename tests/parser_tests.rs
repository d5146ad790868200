// tests/parser_tests.rs

use cypher_scope::ast::{NodeKind, Position, SyntaxNode};
use cypher_scope::parser::{ParseError, parse};
use cypher_scope::walker::{descendants, find_kind};
use pretty_assertions::assert_eq;

fn kinds_along_first_children(node: &SyntaxNode) -> Vec<NodeKind> {
    let mut kinds = vec![node.kind];
    let mut current = node;
    while let Some(child) = current.first_child() {
        kinds.push(child.kind);
        current = child;
    }
    kinds
}

fn count(tree: &SyntaxNode, kind: NodeKind) -> usize {
    descendants(tree).filter(|n| n.kind == kind).count()
}

fn texts(tree: &SyntaxNode, kind: NodeKind) -> Vec<String> {
    descendants(tree)
        .filter(|n| n.kind == kind)
        .map(|n| n.text.clone())
        .collect()
}

// ============================================================================
// Query structure
// ============================================================================

#[test]
fn test_simple_query_shape() {
    let tree = parse("MATCH (n) RETURN n").unwrap();

    assert_eq!(
        kinds_along_first_children(&tree),
        vec![
            NodeKind::Cypher,
            NodeKind::Statement,
            NodeKind::Query,
            NodeKind::RegularQuery,
            NodeKind::SingleQuery,
            NodeKind::SinglePartQuery,
            NodeKind::ReadingClause,
            NodeKind::Match,
            NodeKind::Pattern,
            NodeKind::PatternPart,
            NodeKind::PatternElement,
            NodeKind::NodePattern,
            NodeKind::Variable,
        ]
    );

    let single = find_kind(&tree, NodeKind::SinglePartQuery).unwrap();
    let clause_kinds: Vec<_> = single.children.iter().map(|c| c.kind).collect();
    assert_eq!(clause_kinds, vec![NodeKind::ReadingClause, NodeKind::Return]);
}

#[test]
fn test_with_makes_a_multi_part_query() {
    let tree = parse("MATCH (n) WITH n MATCH (n)-->(m) RETURN m").unwrap();

    let multi = find_kind(&tree, NodeKind::MultiPartQuery).unwrap();
    let kinds: Vec<_> = multi.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ReadingClause,
            NodeKind::With,
            NodeKind::SinglePartQuery,
        ]
    );

    let rest = multi.children.last().unwrap();
    assert_eq!(rest.text, "MATCH(n)-->(m)RETURN m");
}

#[test]
fn test_several_with_parts_are_flattened() {
    let tree = parse("UNWIND [1] AS x WITH x WITH x AS y RETURN y").unwrap();

    let multi = find_kind(&tree, NodeKind::MultiPartQuery).unwrap();
    let kinds: Vec<_> = multi.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ReadingClause,
            NodeKind::With,
            NodeKind::With,
            NodeKind::SinglePartQuery,
        ]
    );
}

#[test]
fn test_updating_query_without_return() {
    let tree = parse("CREATE (a:Person {name: 'Ann'})").unwrap();
    let single = find_kind(&tree, NodeKind::SinglePartQuery).unwrap();
    assert_eq!(single.children.len(), 1);
    assert!(single.children[0].is(NodeKind::UpdatingClause));
}

#[test]
fn test_standalone_call() {
    let tree = parse("CALL db.labels()").unwrap();
    let query = find_kind(&tree, NodeKind::Query).unwrap();
    assert!(query.children[0].is(NodeKind::StandaloneCall));
    assert_eq!(texts(&tree, NodeKind::ProcedureName), vec!["db.labels"]);
}

#[test]
fn test_call_followed_by_clauses_is_in_query_call() {
    let tree = parse("CALL db.labels() YIELD label AS l RETURN l").unwrap();
    assert!(find_kind(&tree, NodeKind::StandaloneCall).is_none());

    let item = find_kind(&tree, NodeKind::YieldItem).unwrap();
    let kinds: Vec<_> = item.children.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![NodeKind::ProcedureResultField, NodeKind::Variable]);
}

#[test]
fn test_union_parses() {
    let tree = parse("RETURN 1 AS x UNION ALL RETURN 2 AS x").unwrap();
    let union = find_kind(&tree, NodeKind::Union).unwrap();
    assert_eq!(union.position, Position::new(1, 14));
}

#[test]
fn test_trailing_semicolon() {
    assert!(parse("RETURN 1;").is_ok());
}

// ============================================================================
// Clauses
// ============================================================================

#[test]
fn test_where_is_kept_in_the_tree() {
    let tree = parse("MATCH (n) WHERE n.x = 1 RETURN n").unwrap();
    let filter = find_kind(&tree, NodeKind::Where).unwrap();
    assert_eq!(filter.text, "WHERE n.x=1");
    assert_eq!(filter.position, Position::new(1, 10));
}

#[test]
fn test_merge_with_actions() {
    let tree = parse("MERGE (n:Person {id: 1}) ON CREATE SET n.created = 1 ON MATCH SET n.seen = 2").unwrap();
    assert_eq!(count(&tree, NodeKind::MergeAction), 2);
    assert_eq!(count(&tree, NodeKind::SetItem), 2);
}

#[test]
fn test_set_item_forms() {
    let tree = parse("MATCH (n) SET n.x = 1, n = {a: 1}, n += {b: 2}, n:Label").unwrap();
    assert_eq!(
        texts(&tree, NodeKind::SetItem),
        vec!["n.x=1", "n={a:1}", "n+={b:2}", "n:Label"]
    );
}

#[test]
fn test_delete_and_remove() {
    let tree = parse("MATCH (n) REMOVE n:Temp, n.flag DETACH DELETE n").unwrap();
    assert_eq!(texts(&tree, NodeKind::RemoveItem), vec!["n:Temp", "n.flag"]);
    assert_eq!(count(&tree, NodeKind::Delete), 1);
}

#[test]
fn test_projection_modifiers() {
    let tree = parse("MATCH (n) RETURN DISTINCT n.name AS name ORDER BY name DESC SKIP 1 LIMIT 10").unwrap();
    let body = find_kind(&tree, NodeKind::ProjectionBody).unwrap();
    let kinds: Vec<_> = body.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ProjectionItems,
            NodeKind::Order,
            NodeKind::Skip,
            NodeKind::Limit,
        ]
    );
}

#[test]
fn test_projection_star() {
    let tree = parse("MATCH (n) WITH *, n.x AS x RETURN x").unwrap();
    let items = find_kind(&tree, NodeKind::ProjectionItems).unwrap();
    assert_eq!(items.text, "*,n.x AS x");
    assert_eq!(items.children.len(), 1);
}

#[test]
fn test_unwind() {
    let tree = parse("UNWIND [1, 2, 3] AS x RETURN x").unwrap();
    let unwind = find_kind(&tree, NodeKind::Unwind).unwrap();
    let kinds: Vec<_> = unwind.children.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![NodeKind::Expression, NodeKind::Variable]);
    assert_eq!(unwind.children[1].text, "x");
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn test_relationship_chain() {
    let tree = parse("MATCH (a)-[r:KNOWS|LIKES*1..3]->(b)<--(c) RETURN a").unwrap();
    assert_eq!(count(&tree, NodeKind::NodePattern), 3);
    assert_eq!(count(&tree, NodeKind::RelationshipPattern), 2);
    assert_eq!(count(&tree, NodeKind::RelationshipDetail), 1);
    assert_eq!(texts(&tree, NodeKind::RangeLiteral), vec!["*1..3"]);
}

#[test]
fn test_path_variable() {
    let tree = parse("MATCH p = (a)--(b) RETURN p").unwrap();
    let part = find_kind(&tree, NodeKind::PatternPart).unwrap();
    assert!(part.children[0].is(NodeKind::Variable));
    assert_eq!(part.children[0].text, "p");
}

#[test]
fn test_node_pattern_properties() {
    let tree = parse("MATCH (n:Person:Admin {name: $name}) RETURN n").unwrap();
    let node = find_kind(&tree, NodeKind::NodePattern).unwrap();
    let kinds: Vec<_> = node.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![NodeKind::Variable, NodeKind::NodeLabels, NodeKind::Properties]
    );
    assert_eq!(count(&tree, NodeKind::NodeLabel), 2);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_node_text_is_normalized() {
    let tree = parse("MATCH (n) RETURN count( DISTINCT n ),  n.name  +  1").unwrap();
    let items = find_kind(&tree, NodeKind::ProjectionItems).unwrap();
    let expressions: Vec<_> = items
        .children
        .iter()
        .map(|item| item.children[0].text.clone())
        .collect();
    assert_eq!(expressions, vec!["count(DISTINCT n)", "n.name+1"]);
}

#[test]
fn test_operator_levels_only_when_present() {
    let tree = parse("RETURN a OR b AND NOT c = d + e * f ^ g").unwrap();
    for kind in [
        NodeKind::OrExpression,
        NodeKind::AndExpression,
        NodeKind::NotExpression,
        NodeKind::ComparisonExpression,
        NodeKind::AddOrSubtractExpression,
        NodeKind::MultiplyDivideModuloExpression,
        NodeKind::PowerOfExpression,
    ] {
        assert_eq!(count(&tree, kind), 1, "expected one {:?}", kind);
    }
    assert_eq!(count(&tree, NodeKind::XorExpression), 0);
    assert_eq!(count(&tree, NodeKind::Variable), 7);
}

#[test]
fn test_predicates() {
    let tree = parse("RETURN a STARTS WITH 'x', b IN [1, 2], c IS NOT NULL, d CONTAINS e").unwrap();
    assert_eq!(count(&tree, NodeKind::PredicateExpression), 4);
}

#[test]
fn test_function_invocations() {
    let tree = parse("RETURN toUpper(n.name), apoc.coll.sum(xs), count(*)").unwrap();
    assert_eq!(texts(&tree, NodeKind::FunctionName), vec!["toUpper", "apoc.coll.sum"]);
    assert_eq!(count(&tree, NodeKind::CountStar), 1);
    assert_eq!(texts(&tree, NodeKind::Variable), vec!["n", "xs"]);
}

#[test]
fn test_case_expression() {
    let tree = parse("RETURN CASE x WHEN 1 THEN 'one' WHEN 2 THEN 'two' ELSE 'many' END").unwrap();
    let case = find_kind(&tree, NodeKind::CaseExpression).unwrap();
    assert_eq!(count(case, NodeKind::CaseAlternative), 2);
}

#[test]
fn test_list_index_and_slice() {
    let tree = parse("RETURN xs[0], xs[1..], xs[..2]").unwrap();
    assert_eq!(count(&tree, NodeKind::ListOperator), 3);
    assert_eq!(count(&tree, NodeKind::PropertyExpression), 3);
}

#[test]
fn test_map_keys_are_not_variables() {
    let tree = parse("RETURN {name: n, end: 1}").unwrap();
    assert_eq!(texts(&tree, NodeKind::PropertyKeyName), vec!["name", "end"]);
    assert_eq!(texts(&tree, NodeKind::Variable), vec!["n"]);
}

#[test]
fn test_node_positions() {
    let tree = parse("MATCH (n)\nRETURN n.name").unwrap();
    let variables: Vec<Position> = descendants(&tree)
        .filter(|n| n.is(NodeKind::Variable))
        .map(|n| n.position)
        .collect();
    assert_eq!(variables, vec![Position::new(1, 7), Position::new(2, 7)]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unclosed_node_pattern() {
    let err = parse("MATCH (n RETURN n").unwrap_err();
    assert_eq!(err.position(), Position::new(1, 9));
    assert!(err.to_string().contains("')' to close a node pattern"));
}

#[test]
fn test_missing_return() {
    let err = parse("MATCH (n)").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { ref found, .. } if found == "end of input"));
}

#[test]
fn test_trailing_garbage() {
    let err = parse("RETURN 1 2").unwrap_err();
    assert_eq!(err.position(), Position::new(1, 9));
}

#[test]
fn test_lex_errors_surface_through_parse() {
    let err = parse("RETURN 'abc").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
}
