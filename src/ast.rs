//! # Query Tree
//!
//! This module defines the tree the parser produces for the supported Cypher
//! subset and the token types the lexer produces on the way there.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens, keywords and source positions
//! - **[kinds]** - [`NodeKind`], the grammar-rule discriminator of every node
//! - **[node]** - [`SyntaxNode`], the generic tree node
//!
//! Each node carries a kind, its normalized text, its start position and its
//! children. Consumers dispatch on [`NodeKind`] with exhaustive `match`.
//!
//! ## Example
//!
//! ```text
//! MATCH (n) RETURN n
//! ```
//!
//! parses to
//!
//! ```text
//! Cypher
//! └─ Statement
//!    └─ Query
//!       └─ RegularQuery
//!          └─ SingleQuery
//!             └─ SinglePartQuery
//!                ├─ ReadingClause
//!                │  └─ Match
//!                │     └─ Pattern
//!                │        └─ PatternPart
//!                │           └─ PatternElement
//!                │              └─ NodePattern
//!                │                 └─ Variable "n"
//!                └─ Return
//!                   └─ ProjectionBody
//!                      └─ ProjectionItems
//!                         └─ ProjectionItem
//!                            └─ Expression "n"
//!                               └─ Variable "n"
//! ```
pub mod kinds;
pub mod node;
pub mod tokens;

pub use kinds::NodeKind;
pub use node::SyntaxNode;
pub use tokens::{Keyword, Lexeme, Position, Token};
