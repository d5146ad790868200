//! Analysis findings and their rendering.
//!
//! A [`Diagnostic`] is a located finding. Undefined-variable diagnostics are
//! collected during analysis and rendered afterwards by a [`Reporter`], which
//! only needs read access to the source lines.

use std::io::{self, Write};

use serde::Serialize;

use crate::ast::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    UndefinedVariable,
    UnsupportedQuery,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::UndefinedVariable => write!(f, "UndefinedVariable"),
            DiagnosticKind::UnsupportedQuery => write!(f, "UnsupportedQuery"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub name: String,
    pub position: Position,
}

impl Diagnostic {
    pub fn undefined_variable(name: impl Into<String>, position: Position) -> Self {
        Diagnostic {
            kind: DiagnosticKind::UndefinedVariable,
            name: name.into(),
            position,
        }
    }

    pub fn message(&self) -> String {
        format!("{}: `{}`", self.kind, self.name)
    }
}

/// Query constructs the resolver refuses to analyze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Construct {
    /// `WHERE` predicates, anywhere in the query
    Filter,
    /// `MERGE` upserts
    Merge,
    /// `UNION` of several queries
    Union,
    /// A tree whose top level is not a plain or chained query
    StandaloneShape,
}

impl std::fmt::Display for Construct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Construct::Filter => write!(f, "where"),
            Construct::Merge => write!(f, "merge"),
            Construct::Union => write!(f, "union"),
            Construct::StandaloneShape => write!(f, "query shape"),
        }
    }
}

/// Fatal analysis failure. Never mixed with undefined-variable counts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Unsupported query - {construct} not implemented")]
    Unsupported { construct: Construct, position: Position },
}

impl AnalysisError {
    pub fn diagnostic(&self) -> Diagnostic {
        match self {
            AnalysisError::Unsupported { construct, position } => Diagnostic {
                kind: DiagnosticKind::UnsupportedQuery,
                name: construct.to_string(),
                position: *position,
            },
        }
    }
}

/// Renders messages against the lines of one source text.
pub struct Reporter<'a> {
    lines: Vec<&'a str>,
}

impl<'a> Reporter<'a> {
    pub fn new(source: &'a str) -> Self {
        Reporter {
            lines: source.lines().collect(),
        }
    }

    /// Message with its location, the trimmed source line, and a caret
    /// `column` spaces in.
    pub fn render(&self, message: &str, line: usize, column: usize) -> String {
        let source_line = line
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .map_or("", |l| l.trim());
        format!(
            "{message} on line: {line}, col: {column}\n{source_line}\n{}^",
            " ".repeat(column)
        )
    }

    pub fn report<W: Write>(&self, out: &mut W, diagnostic: &Diagnostic) -> io::Result<()> {
        let rendered = self.render(
            &diagnostic.message(),
            diagnostic.position.line,
            diagnostic.position.column,
        );
        writeln!(out, "{}", rendered)
    }

    pub fn report_json<W: Write>(&self, out: &mut W, diagnostic: &Diagnostic) -> io::Result<()> {
        let json = serde_json::to_string(diagnostic).map_err(io::Error::other)?;
        writeln!(out, "{}", json)
    }
}
