//! Metadata catalog collaborator
//!
//! The connector needs two things from the catalog: an existence check for
//! entities ([`EntityOracle`]) and a sink for change records ([`Emitter`]).
//! Both are passed in explicitly; there is no process-wide client.

pub mod memory;
#[cfg(feature = "api-backend")]
pub mod rest;
pub mod wire;

pub use memory::InMemoryCatalog;
#[cfg(feature = "api-backend")]
pub use rest::RestCatalog;

use crate::models::ChangeRecord;

/// Error raised by a catalog backend
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The catalog answered with an unexpected status
    #[error("Catalog returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid urn: {0}")]
    InvalidUrn(String),

    #[error("Invalid server url '{url}': {reason}")]
    InvalidServer { url: String, reason: String },
}

/// Answers whether an entity is already known to the catalog
pub trait EntityOracle {
    fn exists(&self, urn: &str) -> Result<bool, CatalogError>;
}

/// Delivers change records to the catalog
pub trait Emitter {
    fn emit(&self, record: &ChangeRecord) -> Result<(), CatalogError>;
}

impl<T: EntityOracle + ?Sized> EntityOracle for &T {
    fn exists(&self, urn: &str) -> Result<bool, CatalogError> {
        (**self).exists(urn)
    }
}

impl<T: Emitter + ?Sized> Emitter for &T {
    fn emit(&self, record: &ChangeRecord) -> Result<(), CatalogError> {
        (**self).emit(record)
    }
}
