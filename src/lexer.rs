use crate::ast::{Keyword, Lexeme, Position, Token};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character '{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: Position },

    #[error("unterminated comment starting at {position}")]
    UnterminatedComment { position: Position },

    #[error("unterminated quoted name starting at {position}")]
    UnterminatedQuotedName { position: Position },

    #[error("invalid escape sequence '\\{ch}' at {position}")]
    InvalidEscape { ch: char, position: Position },

    #[error("invalid number literal '{text}' at {position}")]
    InvalidNumber { text: String, position: Position },
}

impl LexError {
    pub fn position(&self) -> Position {
        match self {
            LexError::UnexpectedChar { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::UnterminatedComment { position }
            | LexError::UnterminatedQuotedName { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::InvalidNumber { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn location(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.current_char(), self.peek_char(1)) {
                (Some(ch), _) if ch.is_whitespace() => self.advance(),
                (Some('/'), Some('/')) => {
                    while let Some(ch) = self.current_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.location();
                    self.advance();
                    self.advance();
                    loop {
                        match (self.current_char(), self.peek_char(1)) {
                            (Some('*'), Some('/')) => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            (Some(_), _) => self.advance(),
                            (None, _) => return Err(LexError::UnterminatedComment { position: start }),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_quoted_name(&mut self) -> Result<String, LexError> {
        let start = self.location();
        let mut result = String::from('`');
        self.advance(); // Consume opening backtick

        while let Some(ch) = self.current_char() {
            self.advance();
            result.push(ch);
            if ch == '`' {
                return Ok(result);
            }
        }

        Err(LexError::UnterminatedQuotedName { position: start })
    }

    /// Reads a quoted string, returning the unescaped value and the raw lexeme.
    fn read_string(&mut self, quote: char) -> Result<(String, String), LexError> {
        let start = self.location();
        let mut value = String::new();
        let mut raw = String::from(quote);
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    self.advance();
                    raw.push(c);
                    return Ok((value, raw));
                }
                '\\' => {
                    let escape_at = self.location();
                    self.advance(); // Consume backslash
                    raw.push('\\');
                    let escaped = match self.current_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('\'') => '\'',
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some(ch) => return Err(LexError::InvalidEscape { ch, position: escape_at }),
                        None => return Err(LexError::UnterminatedString { position: start }),
                    };
                    if let Some(ch) = self.current_char() {
                        raw.push(ch);
                    }
                    value.push(escaped);
                    self.advance();
                }
                _ => {
                    value.push(ch);
                    raw.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<(Token, String), LexError> {
        let start = self.location();
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E')
                && (self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
                    || (matches!(self.peek_char(1), Some('-') | Some('+'))
                        && self.peek_char(2).is_some_and(|c| c.is_ascii_digit())))
            {
                is_float = true;
                number.push(ch);
                self.advance();
                if let Some(sign @ ('-' | '+')) = self.current_char() {
                    number.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        let token = if is_float {
            number.parse::<f64>().map(Token::Float).ok()
        } else {
            number.parse::<i64>().map(Token::Integer).ok()
        };
        match token {
            Some(token) => Ok((token, number)),
            None => Err(LexError::InvalidNumber { text: number, position: start }),
        }
    }

    fn single(&mut self, token: Token, text: &str) -> (Token, String) {
        for _ in text.chars() {
            self.advance();
        }
        (token, text.to_string())
    }

    pub fn next_token(&mut self) -> Result<Lexeme, LexError> {
        self.skip_trivia()?;
        let position = self.location();

        let (token, text) = match self.current_char() {
            None => (Token::Eof, String::new()),
            Some('(') => self.single(Token::LParen, "("),
            Some(')') => self.single(Token::RParen, ")"),
            Some('[') => self.single(Token::LBracket, "["),
            Some(']') => self.single(Token::RBracket, "]"),
            Some('{') => self.single(Token::LBrace, "{"),
            Some('}') => self.single(Token::RBrace, "}"),
            Some(',') => self.single(Token::Comma, ","),
            Some(':') => self.single(Token::Colon, ":"),
            Some(';') => self.single(Token::Semicolon, ";"),
            Some('|') => self.single(Token::Pipe, "|"),
            Some('$') => self.single(Token::Dollar, "$"),
            Some('-') => self.single(Token::Minus, "-"),
            Some('*') => self.single(Token::Star, "*"),
            Some('/') => self.single(Token::Slash, "/"),
            Some('%') => self.single(Token::Percent, "%"),
            Some('^') => self.single(Token::Caret, "^"),
            Some('=') => self.single(Token::Eq, "="),
            Some('.') => {
                if self.peek_char(1) == Some('.') {
                    self.single(Token::DotDot, "..")
                } else if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()?
                } else {
                    self.single(Token::Dot, ".")
                }
            }
            Some('+') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::PlusEq, "+=")
                } else {
                    self.single(Token::Plus, "+")
                }
            }
            Some('<') => match self.peek_char(1) {
                Some('=') => self.single(Token::LtEq, "<="),
                Some('>') => self.single(Token::NotEq, "<>"),
                _ => self.single(Token::Lt, "<"),
            },
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.single(Token::GtEq, ">=")
                } else {
                    self.single(Token::Gt, ">")
                }
            }
            Some('!') if self.peek_char(1) == Some('=') => self.single(Token::NotEq, "!="),
            Some(quote @ ('"' | '\'')) => {
                let (value, raw) = self.read_string(quote)?;
                (Token::String(value), raw)
            }
            Some('`') => {
                let name = self.read_quoted_name()?;
                (Token::Identifier(name.clone()), name)
            }
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();
                match Keyword::lookup(&ident) {
                    Some(keyword) => (Token::Keyword(keyword), ident),
                    None => (Token::Identifier(ident.clone()), ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number()?,
            Some(ch) => return Err(LexError::UnexpectedChar { ch, position }),
        };

        Ok(Lexeme {
            token,
            text,
            position,
        })
    }
}

/// Lexes the whole input. The returned vector always ends with [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut lexemes = Vec::new();
    loop {
        let lexeme = lexer.next_token()?;
        let done = lexeme.token == Token::Eof;
        lexemes.push(lexeme);
        if done {
            return Ok(lexemes);
        }
    }
}

#[test]
fn test_keywords_ignore_case() {
    let mut lexer = Lexer::new("match Return wItH");
    assert_eq!(lexer.next_token().unwrap().token, Token::Keyword(Keyword::Match));
    assert_eq!(lexer.next_token().unwrap().token, Token::Keyword(Keyword::Return));
    assert_eq!(lexer.next_token().unwrap().token, Token::Keyword(Keyword::With));
    assert_eq!(lexer.next_token().unwrap().token, Token::Eof);
}

#[test]
fn test_relationship_arrow() {
    let mut lexer = Lexer::new("(a)-[r]->(b)");
    let tokens: Vec<Token> = std::iter::from_fn(|| {
        let lexeme = lexer.next_token().unwrap();
        (lexeme.token != Token::Eof).then_some(lexeme.token)
    })
    .collect();
    assert_eq!(
        tokens,
        vec![
            Token::LParen,
            Token::Identifier("a".to_string()),
            Token::RParen,
            Token::Minus,
            Token::LBracket,
            Token::Identifier("r".to_string()),
            Token::RBracket,
            Token::Minus,
            Token::Gt,
            Token::LParen,
            Token::Identifier("b".to_string()),
            Token::RParen,
        ]
    );
}
