//! CLI-specific error types

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::convert::NormalizeError;
use crate::generate::GenerateError;
use crate::import::ImportError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI-specific error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Import error: {0}")]
    ImportError(#[from] ImportError),

    #[error("Schema error: {0}")]
    NormalizeError(#[from] NormalizeError),

    #[error("Generation error: {0}")]
    GenerateError(#[from] GenerateError),

    #[error("Catalog error: {0}")]
    CatalogError(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Failed to write output: {0}")]
    OutputError(String),
}
