//! CLI binary entry point for dataproduct-cli

use clap::{ArgAction, Parser, Subcommand};
use dataproduct_connector::catalog::RestCatalog;
use dataproduct_connector::cli::{CliError, UpsertArgs, handle_upsert, preview_upsert};
use dataproduct_connector::config::ConnectorConfig;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dataproduct-cli")]
#[command(about = "Publish vendor data product documents to the metadata catalog")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./.dataproduct.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Metadata service endpoint, overrides the configuration
    #[arg(long, global = true)]
    server: Option<String>,
    /// Access token, overrides the configuration
    #[arg(long, global = true)]
    token: Option<String>,
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upsert a data product, its datasets and glossary terms
    Upsert {
        /// Data product document (JSON or YAML)
        #[arg(short, long, value_parser = existing_file)]
        file: PathBuf,
        /// External url recorded on the data product
        #[arg(long)]
        external_url: Option<String>,
        /// Print the change records without contacting the catalog
        #[arg(long)]
        dry_run: bool,
    },
}

fn existing_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_file() {
        Ok(path)
    } else {
        Err(format!("File '{}' does not exist", value))
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn load_config(cli: &Cli) -> Result<ConnectorConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => ConnectorConfig::load_file(path)?,
        None => ConnectorConfig::load(Path::new("."))?,
    };

    if let Some(server) = &cli.server {
        config.catalog.server = server.clone();
    }
    if let Some(token) = &cli.token {
        config.catalog.token = Some(token.clone());
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Upsert {
            file,
            external_url,
            dry_run,
        } => {
            let args = UpsertArgs {
                file,
                external_url,
                dry_run,
            };

            let stdout = std::io::stdout();
            if dry_run {
                preview_upsert(&args, &config, &mut stdout.lock())?;
                return Ok(());
            }

            let catalog = RestCatalog::new(&config.catalog)?;
            let summary = handle_upsert(&args, &config, &catalog, &mut stdout.lock())?;
            println!(
                "Upserted {} ({} change records)",
                summary.product_urn, summary.records
            );
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
