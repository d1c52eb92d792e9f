//! Upsert command handler

use crate::catalog::{Emitter, EntityOracle, InMemoryCatalog, wire};
use crate::cli::error::CliError;
use crate::config::ConnectorConfig;
use crate::convert::normalize_data_product;
use crate::generate::{GenerateOptions, generate};
use crate::import::DataProductImporter;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Arguments for the upsert command
#[derive(Debug, Clone)]
pub struct UpsertArgs {
    /// Data product document (JSON or YAML)
    pub file: PathBuf,
    /// External url recorded on the data product
    pub external_url: Option<String>,
    /// Print the change records instead of emitting them
    pub dry_run: bool,
}

/// Outcome of a successful upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertSummary {
    pub product_urn: String,
    /// Number of change records emitted (or printed in dry-run mode)
    pub records: usize,
}

/// Handle the upsert command
///
/// Records are emitted one at a time as they are generated, so entities
/// created earlier in the run are visible to later existence checks. In
/// dry-run mode the wire bodies are written to `out` instead.
pub fn handle_upsert<C, W>(
    args: &UpsertArgs,
    config: &ConnectorConfig,
    catalog: &C,
    out: &mut W,
) -> Result<UpsertSummary, CliError>
where
    C: EntityOracle + Emitter,
    W: Write,
{
    if !args.file.exists() {
        return Err(CliError::FileNotFound(args.file.clone()));
    }

    let product = DataProductImporter::new().load_file(&args.file)?;
    let properties = normalize_data_product(&product)?;
    let options =
        GenerateOptions::from_config(config).with_external_url(args.external_url.clone());

    let stream = generate(&product, &properties, catalog, options);
    let product_urn = stream.product_urn().to_string();

    let mut records = 0;
    for record in stream {
        let record = record?;
        if args.dry_run {
            let request = wire::encode(&record)?;
            let rendered = serde_json::to_string_pretty(request.body())
                .map_err(|e| CliError::OutputError(e.to_string()))?;
            writeln!(out, "{}", rendered).map_err(|e| CliError::OutputError(e.to_string()))?;
        } else {
            catalog.emit(&record)?;
        }
        records += 1;
    }

    if args.dry_run {
        info!("Dry run: {} change record(s) for {}", records, product_urn);
    } else {
        info!("Emitted {} change record(s) for {}", records, product_urn);
    }

    Ok(UpsertSummary {
        product_urn,
        records,
    })
}

/// Preview the upsert without contacting the catalog
///
/// Runs a dry run against an empty in-memory catalog, so every record is
/// printed as if nothing existed yet. No server configuration is needed.
pub fn preview_upsert<W: Write>(
    args: &UpsertArgs,
    config: &ConnectorConfig,
    out: &mut W,
) -> Result<UpsertSummary, CliError> {
    let args = UpsertArgs {
        dry_run: true,
        ..args.clone()
    };
    handle_upsert(&args, config, &InMemoryCatalog::new(), out)
}
