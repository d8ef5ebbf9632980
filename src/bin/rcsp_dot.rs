//! Example Graph Export Binary
//!
//! Generates a random instance and writes it to standard out in the DOT
//! format, with sites as pinned vertex positions.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: warn)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! Logs go to standard error; standard out carries only the graph.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin rcsp_dot -- 10 42 0 > graph.dot
//! dot -Kneato -Tsvg graph.dot -o graph.svg
//! ```

use std::io::{self, BufWriter};
use std::num::ParseIntError;
use std::path::Path;
use std::process::ExitCode;

use tracing::{debug, error};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rcsp_kernel::{generate, write_dot, GeneratorError};

/// Error type for the export binary.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// An argument is not an integer.
    #[error("Invalid {name} '{value}': {source}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        source: ParseIntError,
    },
    /// Instance generation failed.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),
    /// Writing the graph failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Initialize the tracing subscriber with JSON or pretty format
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .init();
    }
}

fn parse_arg<T>(name: &'static str, value: &str) -> Result<T, CliError>
where
    T: std::str::FromStr<Err = ParseIntError>,
{
    value.trim().parse().map_err(|source| CliError::InvalidArgument {
        name,
        value: value.to_string(),
        source,
    })
}

fn run(sites_count: &str, seed: &str, show_travel_labels: &str) -> Result<(), CliError> {
    let sites_count: usize = parse_arg("sites count", sites_count)?;
    let seed: u64 = parse_arg("seed", seed)?;
    let show_travel_labels =
        parse_arg::<i64>("show travel edges' labels", show_travel_labels)? != 0;

    let instance = generate(sites_count, seed)?;
    debug!(
        sites_count,
        seed,
        show_travel_labels,
        edges = instance.graph.num_edges(),
        "writing instance"
    );

    let stdout = io::stdout();
    write_dot(&instance.graph, show_travel_labels, BufWriter::new(stdout.lock()))?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        let program_name = args
            .first()
            .and_then(|p| Path::new(p).file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "rcsp_dot".to_string());
        println!(
            "\n{0} outputs an example graph in the DOT format to standard out.\n\n\
             Usage: {0} <sites count> <seed> <show travel edges' labels>\n\
             example: {0} 10 42 0",
            program_name
        );
        return ExitCode::from(2);
    }

    match run(&args[1], &args[2], &args[3]) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "export failed");
            println!("exception occurred: {}", e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg_rejects_garbage() {
        let err = parse_arg::<usize>("seed", "forty-two").unwrap_err();
        assert!(err.to_string().starts_with("Invalid seed 'forty-two'"));
        assert_eq!(parse_arg::<u64>("seed", " 42 ").unwrap(), 42);
    }

    #[test]
    fn test_generator_error_converts() {
        let err: CliError = GeneratorError::InvalidSiteCount { count: 0, max: 32 }.into();
        assert!(matches!(err, CliError::Generator(_)));
    }
}
