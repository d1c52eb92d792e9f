//! Catalog wire encoding
//!
//! Renders change records as the JSON bodies accepted by the catalog's
//! ingestion endpoints: single aspects and generic blobs become metadata
//! change proposals, snapshots become metadata change events.

use serde_json::{Value, json};

use super::CatalogError;
use crate::models::{Aspect, ChangePayload, ChangeRecord, JSON_CONTENT_TYPE};

/// Encoded request body and the endpoint kind it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum WireRequest {
    /// Body for `POST /aspects?action=ingestProposal`
    Proposal(Value),
    /// Body for `POST /entities?action=ingest`
    Snapshot(Value),
}

impl WireRequest {
    pub fn body(&self) -> &Value {
        match self {
            WireRequest::Proposal(body) | WireRequest::Snapshot(body) => body,
        }
    }
}

pub fn encode(record: &ChangeRecord) -> Result<WireRequest, CatalogError> {
    match &record.payload {
        ChangePayload::Aspect(aspect) => {
            let value = aspect_value(aspect)?;
            Ok(WireRequest::Proposal(proposal(
                record,
                aspect.name(),
                JSON_CONTENT_TYPE,
                &value,
            )?))
        }
        ChangePayload::Generic {
            aspect_name,
            content_type,
            value,
        } => Ok(WireRequest::Proposal(proposal(
            record,
            aspect_name,
            content_type,
            value,
        )?)),
        ChangePayload::Snapshot(aspects) => {
            let snapshot_name = record.entity_type.snapshot_name().ok_or_else(|| {
                CatalogError::SerializationError(format!(
                    "Entity type {} does not support snapshots",
                    record.entity_type
                ))
            })?;

            let aspects = aspects
                .iter()
                .map(|aspect| {
                    let mut entry = serde_json::Map::new();
                    entry.insert(aspect.qualified_name().to_string(), aspect_value(aspect)?);
                    Ok(Value::Object(entry))
                })
                .collect::<Result<Vec<Value>, CatalogError>>()?;

            Ok(WireRequest::Snapshot(json!({
                "entity": {
                    "value": {
                        snapshot_name: {
                            "urn": record.entity_urn,
                            "aspects": aspects,
                        }
                    }
                }
            })))
        }
    }
}

fn aspect_value(aspect: &Aspect) -> Result<Value, CatalogError> {
    aspect
        .to_value()
        .map_err(|e| CatalogError::SerializationError(format!("{}: {}", aspect.name(), e)))
}

/// Aspect values travel as serialized JSON strings inside the proposal
fn proposal(
    record: &ChangeRecord,
    aspect_name: &str,
    content_type: &str,
    value: &Value,
) -> Result<Value, CatalogError> {
    let serialized = serde_json::to_string(value)
        .map_err(|e| CatalogError::SerializationError(format!("{}: {}", aspect_name, e)))?;

    Ok(json!({
        "proposal": {
            "entityType": record.entity_type.as_str(),
            "entityUrn": record.entity_urn,
            "changeType": record.change_type,
            "aspectName": aspect_name,
            "aspect": {
                "value": serialized,
                "contentType": content_type,
            }
        }
    }))
}
