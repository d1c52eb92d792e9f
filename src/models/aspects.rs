//! Catalog aspect models
//!
//! Typed property sets attached to catalog entities. Field names serialize
//! to the catalog's camelCase wire names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Actor used when the catalog does not know who made a change
pub const UNKNOWN_ACTOR: &str = "urn:li:corpuser:unknown";

/// Who changed something, and when
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditStamp {
    /// Milliseconds since the Unix epoch
    pub time: i64,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuditStamp {
    pub fn new(time: i64, actor: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            time,
            actor: actor.into(),
            message: Some(message.into()),
        }
    }

    /// Zero stamp attributed to the unknown actor
    pub fn unknown() -> Self {
        Self {
            time: 0,
            actor: UNKNOWN_ACTOR.to_string(),
            message: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainProperties {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatasetProperties {
    pub name: String,
    pub custom_properties: BTreeMap<String, String>,
}

/// Native schema representation carried by [`SchemaMetadata`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum PlatformSchema {
    #[serde(rename = "com.linkedin.schema.OtherSchema")]
    OtherSchema {
        #[serde(rename = "rawSchema")]
        raw_schema: String,
    },
}

/// Logical type of a schema field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum FieldDataType {
    #[serde(rename = "com.linkedin.schema.NullType")]
    Null {},
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaFieldDataType {
    pub r#type: FieldDataType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlossaryTermAssociation {
    pub urn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerms {
    pub terms: Vec<GlossaryTermAssociation>,
    pub audit_stamp: AuditStamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaField {
    pub field_path: String,
    pub r#type: SchemaFieldDataType,
    pub description: String,
    pub native_data_type: String,
    pub nullable: bool,
    pub recursive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glossary_terms: Option<GlossaryTerms>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetadata {
    pub schema_name: String,
    /// Data platform urn
    pub platform: String,
    pub version: i64,
    pub hash: String,
    pub platform_schema: PlatformSchema,
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataProductAssociation {
    pub destination_urn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataProductProperties {
    pub name: String,
    pub description: String,
    pub assets: Vec<DataProductAssociation>,
    pub custom_properties: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

/// Domain membership of an entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Domains {
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OwnershipType {
    BusinessOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    /// Corp user urn
    pub owner: String,
    pub r#type: OwnershipType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ownership {
    pub owners: Vec<Owner>,
    pub last_modified: AuditStamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Status {
    pub removed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermInfo {
    pub name: String,
    pub definition: String,
    pub term_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrowsePaths {
    pub paths: Vec<String>,
}

/// A typed aspect, tagged with the aspect name it is stored under
#[derive(Debug, Clone, PartialEq)]
pub enum Aspect {
    DomainProperties(DomainProperties),
    DatasetProperties(DatasetProperties),
    SchemaMetadata(SchemaMetadata),
    DataProductProperties(DataProductProperties),
    Domains(Domains),
    Ownership(Ownership),
    Status(Status),
    GlossaryTermInfo(GlossaryTermInfo),
    BrowsePaths(BrowsePaths),
}

impl Aspect {
    /// Aspect name as known to the catalog
    pub fn name(&self) -> &'static str {
        match self {
            Aspect::DomainProperties(_) => "domainProperties",
            Aspect::DatasetProperties(_) => "datasetProperties",
            Aspect::SchemaMetadata(_) => "schemaMetadata",
            Aspect::DataProductProperties(_) => "dataProductProperties",
            Aspect::Domains(_) => "domains",
            Aspect::Ownership(_) => "ownership",
            Aspect::Status(_) => "status",
            Aspect::GlossaryTermInfo(_) => "glossaryTermInfo",
            Aspect::BrowsePaths(_) => "browsePaths",
        }
    }

    /// Fully qualified record name, used as union key inside snapshots
    pub fn qualified_name(&self) -> &'static str {
        match self {
            Aspect::DomainProperties(_) => "com.linkedin.domain.DomainProperties",
            Aspect::DatasetProperties(_) => "com.linkedin.dataset.DatasetProperties",
            Aspect::SchemaMetadata(_) => "com.linkedin.schema.SchemaMetadata",
            Aspect::DataProductProperties(_) => "com.linkedin.dataproduct.DataProductProperties",
            Aspect::Domains(_) => "com.linkedin.domain.Domains",
            Aspect::Ownership(_) => "com.linkedin.common.Ownership",
            Aspect::Status(_) => "com.linkedin.common.Status",
            Aspect::GlossaryTermInfo(_) => "com.linkedin.glossary.GlossaryTermInfo",
            Aspect::BrowsePaths(_) => "com.linkedin.common.BrowsePaths",
        }
    }

    /// Aspect body as a JSON value
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        match self {
            Aspect::DomainProperties(a) => serde_json::to_value(a),
            Aspect::DatasetProperties(a) => serde_json::to_value(a),
            Aspect::SchemaMetadata(a) => serde_json::to_value(a),
            Aspect::DataProductProperties(a) => serde_json::to_value(a),
            Aspect::Domains(a) => serde_json::to_value(a),
            Aspect::Ownership(a) => serde_json::to_value(a),
            Aspect::Status(a) => serde_json::to_value(a),
            Aspect::GlossaryTermInfo(a) => serde_json::to_value(a),
            Aspect::BrowsePaths(a) => serde_json::to_value(a),
        }
    }
}
