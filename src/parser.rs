use crate::{
    ast::{Keyword, Lexeme, NodeKind, Position, SyntaxNode, Token},
    lexer::{LexError, Lexer},
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected}, found {found} at {position}")]
    Unexpected {
        expected: String,
        found: String,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position(),
            ParseError::Unexpected { position, .. } => *position,
        }
    }
}

/// Parses a complete query into its tree.
pub fn parse(source: &str) -> Result<SyntaxNode, ParseError> {
    Parser::new(Lexer::new(source))?.parse()
}

pub struct Parser {
    tokens: Vec<Lexeme>,
    position: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let lexeme = lexer.next_token()?;
            let done = lexeme.token == Token::Eof;
            tokens.push(lexeme);
            if done {
                break;
            }
        }
        Ok(Parser {
            tokens,
            position: 0,
        })
    }

    fn current(&self) -> &Lexeme {
        // The token vector always ends with Eof and `advance` never moves past it.
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn peek_at(&self, offset: usize) -> &Token {
        let index = (self.position + offset).min(self.tokens.len() - 1);
        &self.tokens[index].token
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn check(&self, token: &Token) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.check_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), ParseError> {
        if self.eat(&token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("{:?}", keyword).to_uppercase()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let lexeme = self.current();
        let found = match lexeme.token {
            Token::Eof => "end of input".to_string(),
            _ => format!("'{}'", lexeme.text),
        };
        ParseError::Unexpected {
            expected: expected.to_string(),
            found,
            position: lexeme.position,
        }
    }

    /// Builds a node spanning the tokens from `start` up to the current position.
    fn node(&self, kind: NodeKind, start: usize, children: Vec<SyntaxNode>) -> SyntaxNode {
        let end = self.position.max(start);
        let mut text = String::new();
        let mut previous_word = false;
        for lexeme in &self.tokens[start..end] {
            let word = lexeme.token.is_word();
            if word && previous_word {
                text.push(' ');
            }
            text.push_str(&lexeme.text);
            previous_word = word;
        }
        let position = self.tokens[start.min(self.tokens.len() - 1)].position;
        SyntaxNode::new(kind, text, position, children)
    }

    /// Parse a complete query, including the optional trailing semicolon
    pub fn parse(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let statement = self.parse_statement()?;
        self.eat(&Token::Semicolon);
        if !self.check(&Token::Eof) {
            return Err(self.unexpected("end of query"));
        }
        Ok(self.node(NodeKind::Cypher, start, vec![statement]))
    }

    fn parse_statement(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let query = self.parse_query()?;
        Ok(self.node(NodeKind::Statement, start, vec![query]))
    }

    fn parse_query(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;

        if self.check_keyword(Keyword::Call) {
            // A CALL followed by nothing else is a standalone call; anything
            // after it makes the CALL the first reading clause of a regular query.
            if let Ok(call) = self.parse_standalone_call() {
                if self.check(&Token::Semicolon) || self.check(&Token::Eof) {
                    return Ok(self.node(NodeKind::Query, start, vec![call]));
                }
            }
            self.position = start;
        }

        let regular = self.parse_regular_query()?;
        Ok(self.node(NodeKind::Query, start, vec![regular]))
    }

    fn parse_standalone_call(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Call)?;
        let mut children = vec![self.parse_procedure_invocation()?];
        if self.eat_keyword(Keyword::Yield) {
            children.push(self.parse_yield_items()?);
        }
        Ok(self.node(NodeKind::StandaloneCall, start, children))
    }

    fn parse_regular_query(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = vec![self.parse_single_query()?];

        while self.check_keyword(Keyword::Union) {
            let union_start = self.position;
            self.advance();
            self.eat_keyword(Keyword::All);
            let query = self.parse_single_query()?;
            children.push(self.node(NodeKind::Union, union_start, vec![query]));
        }

        Ok(self.node(NodeKind::RegularQuery, start, children))
    }

    fn at_reading_clause(&self) -> bool {
        self.check_keyword(Keyword::Match)
            || self.check_keyword(Keyword::Optional)
            || self.check_keyword(Keyword::Unwind)
            || self.check_keyword(Keyword::Call)
    }

    fn at_updating_clause(&self) -> bool {
        self.check_keyword(Keyword::Create)
            || self.check_keyword(Keyword::Merge)
            || self.check_keyword(Keyword::Set)
            || self.check_keyword(Keyword::Delete)
            || self.check_keyword(Keyword::Detach)
            || self.check_keyword(Keyword::Remove)
    }

    /// Parses query parts up to the final single-part query.
    ///
    /// Each `WITH` closes a part; the clauses of every closed part become direct
    /// children of a `MultiPartQuery`, followed by the final `SinglePartQuery`.
    fn parse_single_query(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut parts = Vec::new();

        loop {
            let part_start = self.position;
            let mut clauses = Vec::new();

            while self.at_reading_clause() {
                clauses.push(self.parse_reading_clause()?);
            }
            while self.at_updating_clause() {
                clauses.push(self.parse_updating_clause()?);
            }

            if self.check_keyword(Keyword::With) {
                clauses.push(self.parse_with()?);
                parts.extend(clauses);
                continue;
            }

            let has_updates = clauses.iter().any(|c| c.is(NodeKind::UpdatingClause));
            if self.check_keyword(Keyword::Return) {
                clauses.push(self.parse_return()?);
            } else if !has_updates {
                return Err(self.unexpected("RETURN, WITH or a clause"));
            }

            let single = self.node(NodeKind::SinglePartQuery, part_start, clauses);
            let query = if parts.is_empty() {
                single
            } else {
                parts.push(single);
                self.node(NodeKind::MultiPartQuery, start, parts)
            };
            return Ok(self.node(NodeKind::SingleQuery, start, vec![query]));
        }
    }

    // ------------------------------------------------------------------------
    // Reading clauses
    // ------------------------------------------------------------------------

    fn parse_reading_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let clause = match self.peek() {
            Token::Keyword(Keyword::Unwind) => self.parse_unwind()?,
            Token::Keyword(Keyword::Call) => self.parse_in_query_call()?,
            _ => self.parse_match()?,
        };
        Ok(self.node(NodeKind::ReadingClause, start, vec![clause]))
    }

    fn parse_match(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.eat_keyword(Keyword::Optional);
        self.expect_keyword(Keyword::Match)?;

        let mut children = vec![self.parse_pattern()?];
        if self.check_keyword(Keyword::Where) {
            children.push(self.parse_where()?);
        }
        Ok(self.node(NodeKind::Match, start, children))
    }

    fn parse_where(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Where)?;
        let condition = self.parse_expression()?;
        Ok(self.node(NodeKind::Where, start, vec![condition]))
    }

    fn parse_unwind(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Unwind)?;
        let source = self.parse_expression()?;
        self.expect_keyword(Keyword::As)?;
        let target = self.parse_variable()?;
        Ok(self.node(NodeKind::Unwind, start, vec![source, target]))
    }

    fn parse_in_query_call(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Call)?;
        let mut children = vec![self.parse_procedure_invocation()?];
        if self.eat_keyword(Keyword::Yield) {
            children.push(self.parse_yield_items()?);
        }
        Ok(self.node(NodeKind::InQueryCall, start, children))
    }

    fn parse_procedure_invocation(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let name_start = self.position;
        self.parse_symbolic_name()?;
        while self.check(&Token::Dot) {
            self.advance();
            self.parse_symbolic_name()?;
        }
        let mut children = vec![self.node(NodeKind::ProcedureName, name_start, vec![])];

        // Arguments may be left out entirely for a standalone call.
        if self.eat(&Token::LParen) {
            if !self.check(&Token::RParen) {
                loop {
                    children.push(self.parse_expression()?);
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
            }
            self.expect(Token::RParen, "')'")?;
        }

        Ok(self.node(NodeKind::ProcedureInvocation, start, children))
    }

    fn parse_yield_items(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = Vec::new();

        if !self.eat(&Token::Star) {
            loop {
                children.push(self.parse_yield_item()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            if self.check_keyword(Keyword::Where) {
                children.push(self.parse_where()?);
            }
        }

        Ok(self.node(NodeKind::YieldItems, start, children))
    }

    fn parse_yield_item(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = Vec::new();

        if self.peek_at(1).is_keyword(Keyword::As) {
            let field_start = self.position;
            self.parse_symbolic_name()?;
            children.push(self.node(NodeKind::ProcedureResultField, field_start, vec![]));
            self.advance(); // Consume AS
        }
        children.push(self.parse_variable()?);

        Ok(self.node(NodeKind::YieldItem, start, children))
    }

    // ------------------------------------------------------------------------
    // Updating clauses
    // ------------------------------------------------------------------------

    fn parse_updating_clause(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let clause = match self.peek() {
            Token::Keyword(Keyword::Create) => self.parse_create()?,
            Token::Keyword(Keyword::Merge) => self.parse_merge()?,
            Token::Keyword(Keyword::Set) => self.parse_set()?,
            Token::Keyword(Keyword::Remove) => self.parse_remove()?,
            _ => self.parse_delete()?,
        };
        Ok(self.node(NodeKind::UpdatingClause, start, vec![clause]))
    }

    fn parse_create(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Create)?;
        let pattern = self.parse_pattern()?;
        Ok(self.node(NodeKind::Create, start, vec![pattern]))
    }

    fn parse_merge(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Merge)?;
        let mut children = vec![self.parse_pattern_part()?];

        while self.check_keyword(Keyword::On) {
            let action_start = self.position;
            self.advance();
            if !self.eat_keyword(Keyword::Match) {
                self.expect_keyword(Keyword::Create)?;
            }
            let set = self.parse_set()?;
            children.push(self.node(NodeKind::MergeAction, action_start, vec![set]));
        }

        Ok(self.node(NodeKind::Merge, start, children))
    }

    fn parse_set(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Set)?;
        let mut children = Vec::new();
        loop {
            children.push(self.parse_set_item()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(self.node(NodeKind::Set, start, children))
    }

    fn parse_set_item(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let variable = self.parse_variable()?;
        let mut children = Vec::new();

        if self.check(&Token::Dot) {
            // n.prop = value
            let mut target = vec![variable];
            while self.check(&Token::Dot) {
                target.push(self.parse_property_lookup()?);
            }
            children.push(self.node(NodeKind::PropertyExpression, start, target));
            self.expect(Token::Eq, "'='")?;
            children.push(self.parse_expression()?);
        } else if self.check(&Token::Colon) {
            // n:Label
            children.push(variable);
            children.push(self.parse_node_labels()?);
        } else {
            // n = map, n += map
            children.push(variable);
            if !self.eat(&Token::PlusEq) {
                self.expect(Token::Eq, "'=' or '+='")?;
            }
            children.push(self.parse_expression()?);
        }

        Ok(self.node(NodeKind::SetItem, start, children))
    }

    fn parse_delete(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.eat_keyword(Keyword::Detach);
        self.expect_keyword(Keyword::Delete)?;
        let mut children = Vec::new();
        loop {
            children.push(self.parse_expression()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(self.node(NodeKind::Delete, start, children))
    }

    fn parse_remove(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Remove)?;
        let mut children = Vec::new();
        loop {
            children.push(self.parse_remove_item()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(self.node(NodeKind::Remove, start, children))
    }

    fn parse_remove_item(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let variable = self.parse_variable()?;

        let children = if self.check(&Token::Colon) {
            vec![variable, self.parse_node_labels()?]
        } else {
            let mut target = vec![variable];
            target.push(self.parse_property_lookup()?);
            while self.check(&Token::Dot) {
                target.push(self.parse_property_lookup()?);
            }
            vec![self.node(NodeKind::PropertyExpression, start, target)]
        };

        Ok(self.node(NodeKind::RemoveItem, start, children))
    }

    // ------------------------------------------------------------------------
    // Projections
    // ------------------------------------------------------------------------

    fn parse_with(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::With)?;
        let mut children = vec![self.parse_projection_body()?];
        if self.check_keyword(Keyword::Where) {
            children.push(self.parse_where()?);
        }
        Ok(self.node(NodeKind::With, start, children))
    }

    fn parse_return(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Return)?;
        let body = self.parse_projection_body()?;
        Ok(self.node(NodeKind::Return, start, vec![body]))
    }

    fn parse_projection_body(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.eat_keyword(Keyword::Distinct);
        let mut children = vec![self.parse_projection_items()?];

        if self.check_keyword(Keyword::Order) {
            let order_start = self.position;
            self.advance();
            self.expect_keyword(Keyword::By)?;
            let mut items = Vec::new();
            loop {
                let item_start = self.position;
                let key = self.parse_expression()?;
                let _ = self.eat_keyword(Keyword::Ascending)
                    || self.eat_keyword(Keyword::Asc)
                    || self.eat_keyword(Keyword::Descending)
                    || self.eat_keyword(Keyword::Desc);
                items.push(self.node(NodeKind::SortItem, item_start, vec![key]));
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
            children.push(self.node(NodeKind::Order, order_start, items));
        }

        if self.check_keyword(Keyword::Skip) {
            let skip_start = self.position;
            self.advance();
            let amount = self.parse_expression()?;
            children.push(self.node(NodeKind::Skip, skip_start, vec![amount]));
        }

        if self.check_keyword(Keyword::Limit) {
            let limit_start = self.position;
            self.advance();
            let amount = self.parse_expression()?;
            children.push(self.node(NodeKind::Limit, limit_start, vec![amount]));
        }

        Ok(self.node(NodeKind::ProjectionBody, start, children))
    }

    /// `*` projects every current binding; it is only visible in the node text.
    fn parse_projection_items(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut items = Vec::new();

        if self.eat(&Token::Star) && !self.eat(&Token::Comma) {
            return Ok(self.node(NodeKind::ProjectionItems, start, items));
        }

        loop {
            items.push(self.parse_projection_item()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }

        Ok(self.node(NodeKind::ProjectionItems, start, items))
    }

    fn parse_projection_item(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = vec![self.parse_expression()?];
        if self.eat_keyword(Keyword::As) {
            children.push(self.parse_variable()?);
        }
        Ok(self.node(NodeKind::ProjectionItem, start, children))
    }

    // ------------------------------------------------------------------------
    // Patterns
    // ------------------------------------------------------------------------

    fn parse_pattern(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut parts = Vec::new();
        loop {
            parts.push(self.parse_pattern_part()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        Ok(self.node(NodeKind::Pattern, start, parts))
    }

    fn parse_pattern_part(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = Vec::new();

        // p = (a)-->(b)
        if self.check(&Token::Identifier(String::new())) && self.peek_at(1) == &Token::Eq {
            children.push(self.parse_variable()?);
            self.advance(); // Consume '='
        }
        children.push(self.parse_pattern_element()?);

        Ok(self.node(NodeKind::PatternPart, start, children))
    }

    fn parse_pattern_element(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;

        if self.check(&Token::LParen) && self.peek_at(1) == &Token::LParen {
            self.advance();
            let inner = self.parse_pattern_element()?;
            self.expect(Token::RParen, "')'")?;
            return Ok(self.node(NodeKind::PatternElement, start, vec![inner]));
        }

        let mut children = vec![self.parse_node_pattern()?];
        while self.check(&Token::Minus) || self.check(&Token::Lt) {
            children.push(self.parse_relationship_pattern()?);
            children.push(self.parse_node_pattern()?);
        }

        Ok(self.node(NodeKind::PatternElement, start, children))
    }

    fn parse_node_pattern(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::LParen, "'(' to start a node pattern")?;

        let mut children = Vec::new();
        if self.check(&Token::Identifier(String::new())) {
            children.push(self.parse_variable()?);
        }
        if self.check(&Token::Colon) {
            children.push(self.parse_node_labels()?);
        }
        if self.check(&Token::LBrace) || self.check(&Token::Dollar) {
            children.push(self.parse_properties()?);
        }

        self.expect(Token::RParen, "')' to close a node pattern")?;
        Ok(self.node(NodeKind::NodePattern, start, children))
    }

    fn parse_node_labels(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut labels = Vec::new();
        while self.check(&Token::Colon) {
            let label_start = self.position;
            self.advance();
            self.parse_symbolic_name()?;
            labels.push(self.node(NodeKind::NodeLabel, label_start, vec![]));
        }
        Ok(self.node(NodeKind::NodeLabels, start, labels))
    }

    fn parse_properties(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let inner = if self.check(&Token::Dollar) {
            self.parse_parameter()?
        } else {
            self.parse_map_literal()?
        };
        Ok(self.node(NodeKind::Properties, start, vec![inner]))
    }

    fn parse_relationship_pattern(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.eat(&Token::Lt);
        self.expect(Token::Minus, "'-'")?;

        let mut children = Vec::new();
        if self.check(&Token::LBracket) {
            children.push(self.parse_relationship_detail()?);
        }

        self.expect(Token::Minus, "'-'")?;
        self.eat(&Token::Gt);
        Ok(self.node(NodeKind::RelationshipPattern, start, children))
    }

    fn parse_relationship_detail(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::LBracket, "'['")?;

        let mut children = Vec::new();
        if self.check(&Token::Identifier(String::new())) {
            children.push(self.parse_variable()?);
        }

        if self.check(&Token::Colon) {
            let types_start = self.position;
            self.advance();
            self.parse_symbolic_name()?;
            while self.eat(&Token::Pipe) {
                self.eat(&Token::Colon);
                self.parse_symbolic_name()?;
            }
            children.push(self.node(NodeKind::RelationshipTypes, types_start, vec![]));
        }

        if self.check(&Token::Star) {
            let range_start = self.position;
            self.advance();
            self.eat(&Token::Integer(0));
            if self.eat(&Token::DotDot) {
                self.eat(&Token::Integer(0));
            }
            children.push(self.node(NodeKind::RangeLiteral, range_start, vec![]));
        }

        if self.check(&Token::LBrace) || self.check(&Token::Dollar) {
            children.push(self.parse_properties()?);
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(self.node(NodeKind::RelationshipDetail, start, children))
    }

    // ------------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------------

    pub fn parse_expression(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let inner = self.parse_or()?;
        Ok(self.node(NodeKind::Expression, start, vec![inner]))
    }

    /// Parses `operand (op operand)*`, producing a `kind` node only when at
    /// least one operator is present.
    fn parse_level(
        &mut self,
        kind: NodeKind,
        operand: fn(&mut Self) -> Result<SyntaxNode, ParseError>,
        is_operator: fn(&Token) -> bool,
    ) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let first = operand(self)?;
        if !is_operator(self.peek()) {
            return Ok(first);
        }

        let mut operands = vec![first];
        while is_operator(self.peek()) {
            self.advance();
            operands.push(operand(self)?);
        }
        Ok(self.node(kind, start, operands))
    }

    fn parse_or(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(NodeKind::OrExpression, Self::parse_xor, |t| {
            t.is_keyword(Keyword::Or)
        })
    }

    fn parse_xor(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(NodeKind::XorExpression, Self::parse_and, |t| {
            t.is_keyword(Keyword::Xor)
        })
    }

    fn parse_and(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(NodeKind::AndExpression, Self::parse_not, |t| {
            t.is_keyword(Keyword::And)
        })
    }

    fn parse_not(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut negated = false;
        while self.eat_keyword(Keyword::Not) {
            negated = true;
        }

        let operand = self.parse_comparison()?;
        if negated {
            Ok(self.node(NodeKind::NotExpression, start, vec![operand]))
        } else {
            Ok(operand)
        }
    }

    fn parse_comparison(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(
            NodeKind::ComparisonExpression,
            Self::parse_add_or_subtract,
            |t| {
                matches!(
                    t,
                    Token::Eq | Token::NotEq | Token::Lt | Token::Gt | Token::LtEq | Token::GtEq
                )
            },
        )
    }

    fn parse_add_or_subtract(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(
            NodeKind::AddOrSubtractExpression,
            Self::parse_multiply_divide_modulo,
            |t| matches!(t, Token::Plus | Token::Minus),
        )
    }

    fn parse_multiply_divide_modulo(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(
            NodeKind::MultiplyDivideModuloExpression,
            Self::parse_power_of,
            |t| matches!(t, Token::Star | Token::Slash | Token::Percent),
        )
    }

    fn parse_power_of(&mut self) -> Result<SyntaxNode, ParseError> {
        self.parse_level(NodeKind::PowerOfExpression, Self::parse_unary, |t| {
            matches!(t, Token::Caret)
        })
    }

    fn parse_unary(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        if self.check(&Token::Plus) || self.check(&Token::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(self.node(NodeKind::UnaryAddOrSubtractExpression, start, vec![operand]));
        }
        self.parse_predicate()
    }

    /// String, list and null predicates: `STARTS WITH`, `ENDS WITH`,
    /// `CONTAINS`, `IN`, `IS NULL`, `IS NOT NULL`.
    fn parse_predicate(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = vec![self.parse_postfix()?];
        let mut has_predicate = false;

        loop {
            match self.peek() {
                Token::Keyword(Keyword::Starts) | Token::Keyword(Keyword::Ends) => {
                    self.advance();
                    self.expect_keyword(Keyword::With)?;
                    children.push(self.parse_add_or_subtract()?);
                }
                Token::Keyword(Keyword::Contains) | Token::Keyword(Keyword::In) => {
                    self.advance();
                    children.push(self.parse_add_or_subtract()?);
                }
                Token::Keyword(Keyword::Is) => {
                    self.advance();
                    self.eat_keyword(Keyword::Not);
                    self.expect_keyword(Keyword::Null)?;
                }
                _ => break,
            }
            has_predicate = true;
        }

        if !has_predicate {
            return Ok(children.remove(0));
        }
        Ok(self.node(NodeKind::PredicateExpression, start, children))
    }

    fn parse_postfix(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        let mut children = vec![self.parse_atom()?];
        let mut has_labels = false;

        loop {
            match self.peek() {
                Token::Dot => children.push(self.parse_property_lookup()?),
                Token::LBracket => children.push(self.parse_list_operator()?),
                Token::Colon => {
                    has_labels = true;
                    children.push(self.parse_node_labels()?);
                }
                _ => break,
            }
        }

        if children.len() == 1 {
            return Ok(children.remove(0));
        }
        let kind = if has_labels {
            NodeKind::LabelsExpression
        } else {
            NodeKind::PropertyExpression
        };
        Ok(self.node(kind, start, children))
    }

    fn parse_property_lookup(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::Dot, "'.'")?;
        let key_start = self.position;
        self.parse_symbolic_name()?;
        let key = self.node(NodeKind::PropertyKeyName, key_start, vec![]);
        Ok(self.node(NodeKind::PropertyLookup, start, vec![key]))
    }

    /// `[index]` or `[from..to]` with either bound optional.
    fn parse_list_operator(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::LBracket, "'['")?;

        let mut children = Vec::new();
        if !self.check(&Token::DotDot) {
            children.push(self.parse_expression()?);
        }
        if self.eat(&Token::DotDot) && !self.check(&Token::RBracket) {
            children.push(self.parse_expression()?);
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(self.node(NodeKind::ListOperator, start, children))
    }

    fn parse_atom(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        match self.peek() {
            Token::Integer(_)
            | Token::Float(_)
            | Token::String(_)
            | Token::Keyword(Keyword::True)
            | Token::Keyword(Keyword::False)
            | Token::Keyword(Keyword::Null) => {
                self.advance();
                Ok(self.node(NodeKind::Literal, start, vec![]))
            }
            Token::LBracket => self.parse_list_literal(),
            Token::LBrace => self.parse_map_literal(),
            Token::Dollar => self.parse_parameter(),
            Token::Keyword(Keyword::Case) => self.parse_case(),
            Token::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(Token::RParen, "')'")?;
                Ok(self.node(NodeKind::ParenthesizedExpression, start, vec![inner]))
            }
            Token::Identifier(_) => {
                let is_count =
                    matches!(self.peek(), Token::Identifier(name) if name.eq_ignore_ascii_case("count"));
                if is_count
                    && self.peek_at(1) == &Token::LParen
                    && self.peek_at(2) == &Token::Star
                    && self.peek_at(3) == &Token::RParen
                {
                    for _ in 0..4 {
                        self.advance();
                    }
                    return Ok(self.node(NodeKind::CountStar, start, vec![]));
                }
                if self.at_function_invocation() {
                    return self.parse_function_invocation();
                }
                self.parse_variable()
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Looks past a possibly namespaced name (`a.b.c`) for an opening parenthesis.
    fn at_function_invocation(&self) -> bool {
        let mut offset = 1;
        while self.peek_at(offset) == &Token::Dot
            && matches!(self.peek_at(offset + 1), Token::Identifier(_) | Token::Keyword(_))
        {
            offset += 2;
        }
        self.peek_at(offset) == &Token::LParen
    }

    fn parse_function_invocation(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.parse_symbolic_name()?;
        while self.check(&Token::Dot) {
            self.advance();
            self.parse_symbolic_name()?;
        }
        let mut children = vec![self.node(NodeKind::FunctionName, start, vec![])];

        self.expect(Token::LParen, "'('")?;
        self.eat_keyword(Keyword::Distinct);
        if !self.check(&Token::RParen) {
            loop {
                children.push(self.parse_expression()?);
                if !self.eat(&Token::Comma) {
                    break;
                }
            }
        }
        self.expect(Token::RParen, "')'")?;

        Ok(self.node(NodeKind::FunctionInvocation, start, children))
    }

    fn parse_list_literal(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::LBracket, "'['")?;

        let mut elements = Vec::new();
        while !self.check(&Token::RBracket) {
            elements.push(self.parse_expression()?);
            if !self.check(&Token::RBracket) {
                self.expect(Token::Comma, "',' or ']'")?;
            }
        }

        self.expect(Token::RBracket, "']'")?;
        Ok(self.node(NodeKind::ListLiteral, start, elements))
    }

    fn parse_map_literal(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::LBrace, "'{'")?;

        let mut pairs = Vec::new();
        while !self.check(&Token::RBrace) {
            let key_start = self.position;
            self.parse_symbolic_name()?;
            pairs.push(self.node(NodeKind::PropertyKeyName, key_start, vec![]));

            self.expect(Token::Colon, "':'")?;
            pairs.push(self.parse_expression()?);

            if !self.check(&Token::RBrace) {
                self.expect(Token::Comma, "',' or '}'")?;
            }
        }

        self.expect(Token::RBrace, "'}'")?;
        Ok(self.node(NodeKind::MapLiteral, start, pairs))
    }

    fn parse_parameter(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect(Token::Dollar, "'$'")?;
        match self.peek() {
            Token::Identifier(_) | Token::Keyword(_) | Token::Integer(_) => self.advance(),
            _ => return Err(self.unexpected("a parameter name")),
        }
        Ok(self.node(NodeKind::Parameter, start, vec![]))
    }

    fn parse_case(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        self.expect_keyword(Keyword::Case)?;

        let mut children = Vec::new();
        if !self.check_keyword(Keyword::When) {
            children.push(self.parse_expression()?);
        }

        if !self.check_keyword(Keyword::When) {
            return Err(self.unexpected("WHEN"));
        }
        while self.check_keyword(Keyword::When) {
            let alternative_start = self.position;
            self.advance();
            let condition = self.parse_expression()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression()?;
            children.push(self.node(
                NodeKind::CaseAlternative,
                alternative_start,
                vec![condition, result],
            ));
        }

        if self.eat_keyword(Keyword::Else) {
            children.push(self.parse_expression()?);
        }
        self.expect_keyword(Keyword::End)?;

        Ok(self.node(NodeKind::CaseExpression, start, children))
    }

    fn parse_variable(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.position;
        if !self.check(&Token::Identifier(String::new())) {
            return Err(self.unexpected("a variable name"));
        }
        self.advance();
        Ok(self.node(NodeKind::Variable, start, vec![]))
    }

    /// Labels, property keys and function names may reuse reserved words.
    fn parse_symbolic_name(&mut self) -> Result<(), ParseError> {
        match self.peek() {
            Token::Identifier(_) | Token::Keyword(_) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.unexpected("a name")),
        }
    }
}
