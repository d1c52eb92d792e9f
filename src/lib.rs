//! Data product connector - publishes vendor data product documents to a
//! metadata catalog
//!
//! Provides:
//! - Parsing of vendor data product documents (JSON or YAML)
//! - Identifier and urn derivation for catalog entities
//! - Normalization of annotated schema properties
//! - Generation of the ordered change records that create or update the
//!   domain, datasets, data product and glossary terms
//! - Catalog backends (REST, in-memory) behind explicit collaborator traits

pub mod catalog;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod generate;
pub mod import;
pub mod models;
pub mod urn;

// Re-export commonly used types
pub use catalog::{CatalogError, Emitter, EntityOracle, InMemoryCatalog};
#[cfg(feature = "api-backend")]
pub use catalog::RestCatalog;
pub use config::{ConfigError, ConnectorConfig};
pub use convert::{NormalizeError, normalize, patch_property_uri_for_display};
pub use generate::{
    ChangeRecordStream, GenerateError, GenerateOptions, generate, generate_for_product,
};
pub use import::{DataProductImporter, ImportError};

// Re-export models
pub use models::{
    Aspect, ChangePayload, ChangeRecord, EntityType, NormalizedSchemaProperty, OutputPort,
    TermIdentity, VendorDataProduct,
};
