//! Grafter Code Generator
//!
//! Generates a strongly-typed Rust GraphQL client from introspection JSON.

use std::path::PathBuf;

use clap::Parser;
use grafter_define::parse_introspection;
use grafter_gen::config::GeneratorConfig;
use grafter_gen::errors::GeneratorError;
use grafter_gen::output::generate_and_write;
use tracing::{debug, info};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Grafter code generator - transforms GraphQL schemas into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "grafter-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Introspection JSON describing the schema
    #[arg(short, long)]
    schema: PathBuf,

    /// Optional TOML config (scalar mappings, accessor prefix)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for generated code
    #[arg(short, long, default_value = "src/graphql")]
    output: PathBuf,

    /// Print generated code without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,grafter_gen=info,grafter_define=info".to_string(),
            2 => "info,grafter_gen=debug,grafter_define=debug".to_string(),
            _ => "debug,grafter_gen=trace,grafter_define=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    debug!(?config, "loaded configuration");

    let json = std::fs::read_to_string(&cli.schema).map_err(|e| GeneratorError::ReadError {
        path: cli.schema.display().to_string(),
        source: e,
    })?;
    let schema = parse_introspection(&json)?;
    info!(
        kinds = schema.kinds.len(),
        queries = schema.queries.len(),
        mutations = schema.mutations.len(),
        "loaded schema"
    );

    if cli.dry_run {
        info!("dry run mode - no files will be written");
    }

    let files = generate_and_write(&schema, &config, &cli.output, cli.dry_run)?;

    if !cli.dry_run {
        info!(files = files.len(), output = %cli.output.display(), "generation complete");
    }

    Ok(())
}
