//! implgen CLI - Go implementation scaffolding
//!
//! Commands:
//!   basic    - Generate panicking stubs for Go interfaces
//!   repo     - Generate sqlx-backed repository implementations
//!   schema   - Print the JSON Schema of the model or config file

mod cli;

use clap::{Parser, Subcommand};
use implgen::Strategy;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "implgen")]
#[command(author, version, about = "Generate Go implementations from interfaces", long_about = None)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate stub implementations that panic
    Basic {
        #[command(flatten)]
        args: cli::GenerateArgs,

        /// Open an OpenTelemetry span in methods taking a context
        #[arg(long)]
        with_otel: bool,
    },

    /// Generate sqlx repository implementations
    Repo {
        #[command(flatten)]
        args: cli::GenerateArgs,
    },

    /// Print a JSON Schema
    Schema {
        #[arg(value_enum)]
        kind: cli::SchemaKind,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Basic { args, with_otel } => cli::cmd_generate(Strategy::Basic, &args, with_otel),
        Commands::Repo { args } => cli::cmd_generate(Strategy::Repository, &args, false),
        Commands::Schema { kind } => cli::cmd_schema(kind),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(1)
        }
    }
}

/// Log to stderr; `RUST_LOG` applies unless `--verbose` is given
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
