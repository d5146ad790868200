// tests/lexer_tests.rs

use cypher_scope::ast::{Keyword, Position, Token};
use cypher_scope::lexer::{LexError, Lexer, tokenize};
use pretty_assertions::assert_eq;

fn tokens(input: &str) -> Vec<Token> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|lexeme| lexeme.token)
        .filter(|token| *token != Token::Eof)
        .collect()
}

// ============================================================================
// Punctuation and operators
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        (",", Token::Comma),
        (".", Token::Dot),
        (":", Token::Colon),
        (";", Token::Semicolon),
        ("|", Token::Pipe),
        ("$", Token::Dollar),
        ("=", Token::Eq),
        ("<", Token::Lt),
        (">", Token::Gt),
        ("+", Token::Plus),
        ("-", Token::Minus),
        ("*", Token::Star),
        ("/", Token::Slash),
        ("%", Token::Percent),
        ("^", Token::Caret),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let lexeme = lexer.next_token().unwrap();
        assert_eq!(lexeme.token, expected, "Failed for input: {}", input);
        assert_eq!(lexeme.text, input);
        assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
    }
}

#[test]
fn test_two_char_tokens() {
    let test_cases = vec![
        ("<>", Token::NotEq),
        ("!=", Token::NotEq),
        ("<=", Token::LtEq),
        (">=", Token::GtEq),
        ("+=", Token::PlusEq),
        ("..", Token::DotDot),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tokens(input), vec![expected], "Failed for input: {}", input);
    }
}

#[test]
fn test_incoming_relationship_arrow() {
    assert_eq!(
        tokens("<-[]-"),
        vec![
            Token::Lt,
            Token::Minus,
            Token::LBracket,
            Token::RBracket,
            Token::Minus,
        ]
    );
}

#[test]
fn test_variable_length_range() {
    assert_eq!(
        tokens("*1..3"),
        vec![Token::Star, Token::Integer(1), Token::DotDot, Token::Integer(3)]
    );
}

// ============================================================================
// Keywords and names
// ============================================================================

#[test]
fn test_keywords_any_case() {
    assert_eq!(
        tokens("MATCH optional Unwind yield"),
        vec![
            Token::Keyword(Keyword::Match),
            Token::Keyword(Keyword::Optional),
            Token::Keyword(Keyword::Unwind),
            Token::Keyword(Keyword::Yield),
        ]
    );
}

#[test]
fn test_keyword_keeps_source_text() {
    let lexemes = tokenize("distinct").unwrap();
    assert_eq!(lexemes[0].token, Token::Keyword(Keyword::Distinct));
    assert_eq!(lexemes[0].text, "distinct");
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("n friend_count _x n2"),
        vec![
            Token::Identifier("n".to_string()),
            Token::Identifier("friend_count".to_string()),
            Token::Identifier("_x".to_string()),
            Token::Identifier("n2".to_string()),
        ]
    );
}

#[test]
fn test_quoted_name_keeps_backticks() {
    assert_eq!(
        tokens("`odd name`"),
        vec![Token::Identifier("`odd name`".to_string())]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("42 3.14 1e3 2.5E-1 .5"),
        vec![
            Token::Integer(42),
            Token::Float(3.14),
            Token::Float(1000.0),
            Token::Float(0.25),
            Token::Float(0.5),
        ]
    );
}

#[test]
fn test_property_access_is_not_a_float() {
    assert_eq!(
        tokens("n.x"),
        vec![
            Token::Identifier("n".to_string()),
            Token::Dot,
            Token::Identifier("x".to_string()),
        ]
    );
}

#[test]
fn test_strings_and_escapes() {
    let lexemes = tokenize(r#"'it\'s' "a\"b" 'tab\t'"#).unwrap();
    assert_eq!(lexemes[0].token, Token::String("it's".to_string()));
    assert_eq!(lexemes[0].text, r"'it\'s'");
    assert_eq!(lexemes[1].token, Token::String("a\"b".to_string()));
    assert_eq!(lexemes[2].token, Token::String("tab\t".to_string()));
}

// ============================================================================
// Trivia and positions
// ============================================================================

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        tokens("MATCH // line comment\n/* block\ncomment */ (n)"),
        vec![
            Token::Keyword(Keyword::Match),
            Token::LParen,
            Token::Identifier("n".to_string()),
            Token::RParen,
        ]
    );
}

#[test]
fn test_positions_are_line_and_column() {
    let lexemes = tokenize("MATCH (n)\n  RETURN n").unwrap();
    let positions: Vec<Position> = lexemes.iter().map(|l| l.position).collect();
    assert_eq!(
        positions,
        vec![
            Position::new(1, 0),
            Position::new(1, 6),
            Position::new(1, 7),
            Position::new(1, 8),
            Position::new(2, 2),
            Position::new(2, 9),
            Position::new(2, 10),
        ]
    );
}

#[test]
fn test_eof_is_always_last() {
    let lexemes = tokenize("").unwrap();
    assert_eq!(lexemes.len(), 1);
    assert_eq!(lexemes[0].token, Token::Eof);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unexpected_character() {
    let err = tokenize("RETURN #").unwrap_err();
    assert_eq!(
        err,
        LexError::UnexpectedChar {
            ch: '#',
            position: Position::new(1, 7)
        }
    );
}

#[test]
fn test_unterminated_string() {
    let err = tokenize("RETURN\n 'abc").unwrap_err();
    assert_eq!(
        err,
        LexError::UnterminatedString {
            position: Position::new(2, 1)
        }
    );
}

#[test]
fn test_unterminated_comment() {
    let err = tokenize("/* never closed").unwrap_err();
    assert_eq!(err.position(), Position::new(1, 0));
}

#[test]
fn test_invalid_escape() {
    let err = tokenize(r"'\q'").unwrap_err();
    assert!(matches!(err, LexError::InvalidEscape { ch: 'q', .. }));
}
