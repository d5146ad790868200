use serde::Serialize;

/// Source location of a token or tree node.
///
/// Lines are 1-based, columns are 0-based and counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Reserved words of the supported Cypher subset.
///
/// Matching is case-insensitive: `MATCH`, `match` and `Match` are the same keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Clauses
    Match,
    Optional,
    Where,
    Return,
    With,
    Unwind,
    Create,
    Merge,
    On,
    Set,
    Delete,
    Detach,
    Remove,
    Call,
    Yield,
    Union,

    // Projection modifiers
    As,
    All,
    Distinct,
    Order,
    By,
    Asc,
    Ascending,
    Desc,
    Descending,
    Skip,
    Limit,

    // Operators
    And,
    Or,
    Xor,
    Not,
    In,
    Starts,
    Ends,
    Contains,
    Is,

    // Literals
    Null,
    True,
    False,

    // Case expressions
    Case,
    When,
    Then,
    Else,
    End,
}

impl Keyword {
    pub fn lookup(ident: &str) -> Option<Self> {
        let keyword = match ident.to_ascii_uppercase().as_str() {
            "MATCH" => Keyword::Match,
            "OPTIONAL" => Keyword::Optional,
            "WHERE" => Keyword::Where,
            "RETURN" => Keyword::Return,
            "WITH" => Keyword::With,
            "UNWIND" => Keyword::Unwind,
            "CREATE" => Keyword::Create,
            "MERGE" => Keyword::Merge,
            "ON" => Keyword::On,
            "SET" => Keyword::Set,
            "DELETE" => Keyword::Delete,
            "DETACH" => Keyword::Detach,
            "REMOVE" => Keyword::Remove,
            "CALL" => Keyword::Call,
            "YIELD" => Keyword::Yield,
            "UNION" => Keyword::Union,
            "AS" => Keyword::As,
            "ALL" => Keyword::All,
            "DISTINCT" => Keyword::Distinct,
            "ORDER" => Keyword::Order,
            "BY" => Keyword::By,
            "ASC" => Keyword::Asc,
            "ASCENDING" => Keyword::Ascending,
            "DESC" => Keyword::Desc,
            "DESCENDING" => Keyword::Descending,
            "SKIP" => Keyword::Skip,
            "LIMIT" => Keyword::Limit,
            "AND" => Keyword::And,
            "OR" => Keyword::Or,
            "XOR" => Keyword::Xor,
            "NOT" => Keyword::Not,
            "IN" => Keyword::In,
            "STARTS" => Keyword::Starts,
            "ENDS" => Keyword::Ends,
            "CONTAINS" => Keyword::Contains,
            "IS" => Keyword::Is,
            "NULL" => Keyword::Null,
            "TRUE" => Keyword::True,
            "FALSE" => Keyword::False,
            "CASE" => Keyword::Case,
            "WHEN" => Keyword::When,
            "THEN" => Keyword::Then,
            "ELSE" => Keyword::Else,
            "END" => Keyword::End,
            _ => return None,
        };
        Some(keyword)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Integer(i64),

    /// Decimal literal, optionally with an exponent
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e10
    /// .5
    /// ```
    Float(f64),

    /// String literal in single or double quotes, escapes resolved
    ///
    /// # Examples
    /// ```text
    /// 'Alice'
    /// "item #1"
    /// ```
    String(String),

    /// Reserved word, see [`Keyword`]
    Keyword(Keyword),

    /// Variable, label, property key or function name
    ///
    /// Backtick-quoted names keep their backticks so that the name text is the
    /// same wherever it appears.
    ///
    /// # Examples
    /// ```text
    /// n
    /// friend_count
    /// `weird name`
    /// ```
    Identifier(String),

    /// Parameter prefix
    ///
    /// # Examples
    /// ```text
    /// $name
    /// $0
    /// ```
    Dollar,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    /// `..` inside variable-length ranges and list slices
    DotDot,
    Colon,
    Semicolon,
    Pipe,

    // Operators
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Plus,
    PlusEq,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,

    /// End of input
    Eof,
}

impl Token {
    /// Word-like tokens need a separating space when node text is rebuilt.
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            Token::Keyword(_)
                | Token::Identifier(_)
                | Token::Integer(_)
                | Token::Float(_)
                | Token::String(_)
        )
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        matches!(self, Token::Keyword(k) if *k == keyword)
    }
}

/// A token together with its source text and start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    pub text: String,
    pub position: Position,
}
