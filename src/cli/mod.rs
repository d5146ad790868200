//! CLI support for cypher-scope
//!
//! Provides programmatic access to the `cyscope` check so that other tools
//! can embed it without spawning a process.

mod check;

pub use check::{CheckOptions, CheckOutcome, OutputFormat, QuerySource, execute_check, exit_code};

use std::{io, path::PathBuf};

/// Errors that stop a check before or instead of reporting diagnostics
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The query file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Diagnostics could not be written
    #[error("failed to write diagnostics: {0}")]
    Output(#[source] io::Error),

    /// Parser error
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// The query uses a construct the resolver does not model
    #[error(transparent)]
    Unsupported(#[from] crate::AnalysisError),

    /// No query provided
    #[error("No query provided. Use --query, --file or pipe a query to stdin.")]
    NoInput,
}
