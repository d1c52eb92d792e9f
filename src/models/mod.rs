//! Models module for the connector
//!
//! Defines the vendor data product document, the normalized schema
//! properties derived from it, and the catalog change records produced
//! from both.

pub mod aspects;
pub mod change;
pub mod data_product;
pub mod schema_property;

pub use aspects::{
    Aspect, AuditStamp, BrowsePaths, DataProductAssociation, DataProductProperties,
    DatasetProperties, DomainProperties, Domains, FieldDataType, GlossaryTermAssociation,
    GlossaryTermInfo, GlossaryTerms, Owner, Ownership, OwnershipType, PlatformSchema, SchemaField,
    SchemaFieldDataType, SchemaMetadata, Status,
};
pub use change::{ChangePayload, ChangeRecord, ChangeType, EntityType, JSON_CONTENT_TYPE};
pub use data_product::{
    EXCLUDED_CUSTOM_PROPERTY_KEYS, OutputPort, OutputPortDetails, SchemaPropertyAnnotation,
    SchemaPropertyBasic, VendorDataProduct, VendorSchema,
};
pub use schema_property::{NormalizedSchemaProperty, TermIdentity};
