//! Check a query for undefined variables

use std::{fs, io::Write, path::PathBuf};

use tracing::{debug, info};

use super::CliError;
use crate::{Diagnostic, Reporter, analyze, parse};

/// Where the query text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySource {
    /// Query text given directly
    Inline(String),
    /// Path of a file holding the query
    File(PathBuf),
}

/// How diagnostics are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Message, source line and caret
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// The query to check
    pub source: QuerySource,
    /// Diagnostic rendering
    pub format: OutputFormat,
}

/// Result of a completed check
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    /// Undefined-variable diagnostics in the order they were reported
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckOutcome {
    pub fn error_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// Exit status used for every failure that is not a diagnostic count.
const HARD_FAILURE: i32 = 255;

/// The diagnostic count, saturated below the hard-failure status; any error
/// maps to the hard-failure status.
pub fn exit_code(result: &Result<CheckOutcome, CliError>) -> i32 {
    match result {
        Ok(outcome) => outcome.error_count().min(HARD_FAILURE as usize - 1) as i32,
        Err(_) => HARD_FAILURE,
    }
}

fn read_source(source: &QuerySource) -> Result<String, CliError> {
    match source {
        QuerySource::Inline(query) => Ok(query.clone()),
        QuerySource::File(path) => fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        }),
    }
}

/// Execute a check, writing diagnostics to `err`
///
/// An unsupported query is reported to `err` with a pointer to the offending
/// clause and returned as [`CliError::Unsupported`]; no undefined-variable
/// diagnostics are written in that case.
pub fn execute_check<W: Write>(options: &CheckOptions, err: &mut W) -> Result<CheckOutcome, CliError> {
    let text = read_source(&options.source)?;
    let reporter = Reporter::new(&text);

    let tree = parse(&text)?;
    debug!(nodes = crate::walker::descendants(&tree).count(), "parsed query");

    let analysis = match analyze(&tree) {
        Ok(analysis) => analysis,
        Err(e) => {
            let diagnostic = e.diagnostic();
            let written = match options.format {
                OutputFormat::Text => writeln!(
                    err,
                    "{}",
                    reporter.render(&e.to_string(), diagnostic.position.line, diagnostic.position.column)
                ),
                OutputFormat::Json => reporter.report_json(err, &diagnostic),
            };
            written.map_err(CliError::Output)?;
            return Err(CliError::Unsupported(e));
        }
    };

    for diagnostic in &analysis.diagnostics {
        match options.format {
            OutputFormat::Text => reporter.report(err, diagnostic),
            OutputFormat::Json => reporter.report_json(err, diagnostic),
        }
        .map_err(CliError::Output)?;
    }

    info!(errors = analysis.error_count(), "check finished");
    Ok(CheckOutcome {
        diagnostics: analysis.diagnostics,
    })
}
