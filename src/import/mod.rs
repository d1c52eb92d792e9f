//! Import functionality
//!
//! Provides the parser for vendor data product documents. JSON is the
//! native format; YAML documents with the same shape are accepted too.

pub mod data_product;

pub use data_product::DataProductImporter;

/// Error during import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Not valid JSON/YAML, a required field is missing, or a field has the
    /// wrong shape
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("IO error: {0}")]
    IoError(String),
}
