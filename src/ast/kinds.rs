/// Grammar rule that produced a [`SyntaxNode`](crate::ast::SyntaxNode).
///
/// The names follow the openCypher grammar. Operator levels of the expression
/// ladder only appear in a tree when their operator is present in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    // Query structure
    Cypher,
    Statement,
    Query,
    RegularQuery,
    Union,
    SingleQuery,
    SinglePartQuery,
    MultiPartQuery,

    // Reading clauses
    ReadingClause,
    Match,
    Unwind,
    InQueryCall,
    StandaloneCall,
    ProcedureInvocation,
    ProcedureName,
    YieldItems,
    YieldItem,
    ProcedureResultField,

    // Updating clauses
    UpdatingClause,
    Create,
    Merge,
    MergeAction,
    Set,
    SetItem,
    Delete,
    Remove,
    RemoveItem,

    // Projections
    With,
    Return,
    ProjectionBody,
    ProjectionItems,
    ProjectionItem,
    Order,
    SortItem,
    Skip,
    Limit,
    Where,

    // Patterns
    Pattern,
    PatternPart,
    PatternElement,
    NodePattern,
    RelationshipPattern,
    RelationshipDetail,
    RelationshipTypes,
    RangeLiteral,
    NodeLabels,
    NodeLabel,
    Properties,

    // Expressions
    Expression,
    OrExpression,
    XorExpression,
    AndExpression,
    NotExpression,
    ComparisonExpression,
    AddOrSubtractExpression,
    MultiplyDivideModuloExpression,
    PowerOfExpression,
    UnaryAddOrSubtractExpression,
    PredicateExpression,
    PropertyExpression,
    PropertyLookup,
    ListOperator,
    LabelsExpression,
    ParenthesizedExpression,
    CaseExpression,
    CaseAlternative,
    FunctionInvocation,
    FunctionName,
    CountStar,

    // Atoms
    Literal,
    ListLiteral,
    MapLiteral,
    PropertyKeyName,
    Parameter,
    Variable,
}

impl NodeKind {
    /// Whether a node of this kind denotes a value-producing expression.
    ///
    /// Reference extraction treats the full text of these nodes as a possible
    /// projected column name.
    pub fn is_expression(self) -> bool {
        use NodeKind::*;
        match self {
            Expression
            | OrExpression
            | XorExpression
            | AndExpression
            | NotExpression
            | ComparisonExpression
            | AddOrSubtractExpression
            | MultiplyDivideModuloExpression
            | PowerOfExpression
            | UnaryAddOrSubtractExpression
            | PredicateExpression
            | PropertyExpression
            | LabelsExpression
            | ParenthesizedExpression
            | CaseExpression
            | FunctionInvocation
            | CountStar
            | Literal
            | ListLiteral
            | MapLiteral
            | Parameter => true,

            Cypher | Statement | Query | RegularQuery | Union | SingleQuery
            | SinglePartQuery | MultiPartQuery | ReadingClause | Match | Unwind
            | InQueryCall | StandaloneCall | ProcedureInvocation | ProcedureName
            | YieldItems | YieldItem | ProcedureResultField | UpdatingClause | Create
            | Merge | MergeAction | Set | SetItem | Delete | Remove | RemoveItem | With
            | Return | ProjectionBody | ProjectionItems | ProjectionItem | Order
            | SortItem | Skip | Limit | Where | Pattern | PatternPart | PatternElement
            | NodePattern | RelationshipPattern | RelationshipDetail
            | RelationshipTypes | RangeLiteral | NodeLabels | NodeLabel | Properties
            | PropertyLookup | ListOperator | CaseAlternative | FunctionName
            | PropertyKeyName | Variable => false,
        }
    }
}
