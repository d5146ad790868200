pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod extract;
pub mod lexer;
pub mod parser;
pub mod processor;
pub mod scope;
pub mod walker;

pub use ast::{Keyword, NodeKind, Position, SyntaxNode, Token};
pub use diagnostics::{AnalysisError, Construct, Diagnostic, DiagnosticKind, Reporter};
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser, parse};
pub use processor::{Analysis, analyze};
pub use scope::{Scope, Variable};
