//! Change record models
//!
//! A [`ChangeRecord`] instructs the catalog to create or update one aspect
//! (or, for snapshots, a fixed group of aspects) on one entity.

use serde::{Deserialize, Serialize};

use super::aspects::Aspect;

/// Content type of generic aspect payloads
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Catalog entity types touched by the connector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityType {
    Domain,
    Dataset,
    DataProduct,
    GlossaryTerm,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Domain => "domain",
            EntityType::Dataset => "dataset",
            EntityType::DataProduct => "dataProduct",
            EntityType::GlossaryTerm => "glossaryTerm",
        }
    }

    /// Snapshot record name used for multi-aspect ingestion
    pub fn snapshot_name(&self) -> Option<&'static str> {
        match self {
            EntityType::Dataset => Some("com.linkedin.metadata.snapshot.DatasetSnapshot"),
            EntityType::GlossaryTerm => Some("com.linkedin.metadata.snapshot.GlossaryTermSnapshot"),
            EntityType::Domain | EntityType::DataProduct => None,
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    #[default]
    Upsert,
}

/// Payload of a change record
#[derive(Debug, Clone, PartialEq)]
pub enum ChangePayload {
    /// A single typed aspect
    Aspect(Aspect),
    /// Several typed aspects ingested together as one entity snapshot
    Snapshot(Vec<Aspect>),
    /// Raw JSON blob stored under a custom aspect name
    Generic {
        aspect_name: String,
        content_type: String,
        value: serde_json::Value,
    },
}

/// One unit of work for the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub entity_type: EntityType,
    pub entity_urn: String,
    pub change_type: ChangeType,
    pub payload: ChangePayload,
}

impl ChangeRecord {
    /// Upsert of a single typed aspect
    pub fn aspect(entity_type: EntityType, entity_urn: impl Into<String>, aspect: Aspect) -> Self {
        Self {
            entity_type,
            entity_urn: entity_urn.into(),
            change_type: ChangeType::Upsert,
            payload: ChangePayload::Aspect(aspect),
        }
    }

    pub fn snapshot(
        entity_type: EntityType,
        entity_urn: impl Into<String>,
        aspects: Vec<Aspect>,
    ) -> Self {
        Self {
            entity_type,
            entity_urn: entity_urn.into(),
            change_type: ChangeType::Upsert,
            payload: ChangePayload::Snapshot(aspects),
        }
    }

    /// Upsert of a raw JSON blob
    pub fn generic_json(
        entity_type: EntityType,
        entity_urn: impl Into<String>,
        aspect_name: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        Self {
            entity_type,
            entity_urn: entity_urn.into(),
            change_type: ChangeType::Upsert,
            payload: ChangePayload::Generic {
                aspect_name: aspect_name.into(),
                content_type: JSON_CONTENT_TYPE.to_string(),
                value,
            },
        }
    }

    /// Name of the aspect this record writes; for snapshots, the first one
    pub fn aspect_name(&self) -> &str {
        match &self.payload {
            ChangePayload::Aspect(aspect) => aspect.name(),
            ChangePayload::Snapshot(aspects) => aspects.first().map(Aspect::name).unwrap_or(""),
            ChangePayload::Generic { aspect_name, .. } => aspect_name.as_str(),
        }
    }

    /// The single typed aspect, if this record carries one
    pub fn as_aspect(&self) -> Option<&Aspect> {
        match &self.payload {
            ChangePayload::Aspect(aspect) => Some(aspect),
            _ => None,
        }
    }
}
