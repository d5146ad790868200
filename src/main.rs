use std::{
    io::{self, Read},
    path::PathBuf,
};

use clap::{Parser as ClapParser, ValueEnum};
use cypher_scope::cli::{self, CheckOptions, CliError, OutputFormat, QuerySource};
use tracing::{debug, error};

#[derive(ClapParser)]
#[command(name = "cyscope")]
#[command(about = "Check a Cypher query for references to undefined variables")]
#[command(version)]
struct Cli {
    /// The query to check
    #[arg(long, conflicts_with = "file")]
    query: Option<String>,

    /// File holding the query to check (reads stdin if neither is given)
    #[arg(long)]
    file: Option<PathBuf>,

    /// How diagnostics are written to stderr
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet, cli.log_format);

    let result = resolve_source(cli.query, cli.file).and_then(|source| {
        let options = CheckOptions {
            source,
            format: match cli.format {
                Format::Text => OutputFormat::Text,
                Format::Json => OutputFormat::Json,
            },
        };
        cli::execute_check(&options, &mut io::stderr().lock())
    });

    match &result {
        Ok(outcome) => debug!(errors = outcome.error_count(), "done"),
        // Already reported with a pointer into the query
        Err(CliError::Unsupported(_)) => {}
        Err(e) => error!("{}", e),
    }
    std::process::exit(cli::exit_code(&result));
}

fn resolve_source(query: Option<String>, file: Option<PathBuf>) -> Result<QuerySource, CliError> {
    match (query, file) {
        (Some(query), _) => Ok(QuerySource::Inline(query)),
        (None, Some(path)) => Ok(QuerySource::File(path)),
        (None, None) if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Io {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            Ok(QuerySource::Inline(buffer))
        }
        (None, None) => Err(CliError::NoInput),
    }
}

fn setup_logging(verbose: u8, quiet: bool, log_format: LogFormat) {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let formatter = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .with_level(true);

    match log_format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(formatter)
                .with(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(formatter.json())
                .with(filter)
                .init();
        }
    }
}
