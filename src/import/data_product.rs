//! Vendor data product importer
//!
//! Parses vendor data product documents (JSON, or the same shape as YAML)
//! into a [`VendorDataProduct`]. Field mapping is explicit: every required
//! key is looked up by its wire name and type-checked.

use super::ImportError;
use crate::models::data_product::*;
use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Keys mapped onto named fields of [`VendorDataProduct`]
const KNOWN_FIELDS: [&str; 22] = [
    "dataProductId",
    "name",
    "description",
    "version",
    "domain",
    "dataAlignmentType",
    "sourceSystems",
    "processing",
    "framework",
    "dataContract",
    "SLAs",
    "useCases",
    "subjectMatterExperts",
    "countryOfOrigin",
    "dataClassification",
    "complianceRequirements",
    "acceptableUse",
    "createdBy",
    "lastModified",
    "updateFrequency",
    "outputPorts",
    "schema",
];

/// Importer for vendor data product documents
#[derive(Debug, Default)]
pub struct DataProductImporter;

impl DataProductImporter {
    pub fn new() -> Self {
        Self
    }

    /// Import a data product from JSON text
    ///
    /// # Example
    ///
    /// ```rust
    /// use dataproduct_connector::import::data_product::DataProductImporter;
    ///
    /// let json = r#"{
    ///   "dataProductId": "https://example.com/products/orders",
    ///   "name": "Orders", "description": "All orders", "version": "1.0",
    ///   "domain": "sales", "dataAlignmentType": "source", "sourceSystems": [],
    ///   "processing": "batch", "framework": "spark", "dataContract": "none",
    ///   "SLAs": "daily", "useCases": [], "subjectMatterExperts": ["jdoe"],
    ///   "countryOfOrigin": [], "dataClassification": "internal",
    ///   "complianceRequirements": [], "acceptableUse": "internal",
    ///   "createdBy": "jdoe", "lastModified": "2024-01-01",
    ///   "updateFrequency": "daily", "outputPorts": []
    /// }"#;
    /// let product = DataProductImporter::new().import_json(json).unwrap();
    /// assert_eq!(product.name, "Orders");
    /// ```
    pub fn import_json(&self, json_content: &str) -> Result<VendorDataProduct, ImportError> {
        let value: JsonValue = serde_json::from_str(json_content)
            .map_err(|e| ImportError::MalformedInput(format!("Failed to parse JSON: {}", e)))?;

        self.import_value(&value)
    }

    /// Import a data product from YAML text
    pub fn import_yaml(&self, yaml_content: &str) -> Result<VendorDataProduct, ImportError> {
        let yaml_value: YamlValue = serde_yaml::from_str(yaml_content)
            .map_err(|e| ImportError::MalformedInput(format!("Failed to parse YAML: {}", e)))?;

        let value: JsonValue = serde_json::to_value(&yaml_value).map_err(|e| {
            ImportError::MalformedInput(format!("Failed to convert YAML to JSON: {}", e))
        })?;

        self.import_value(&value)
    }

    /// Load a data product file, choosing the parser by file extension
    pub fn load_file(&self, path: &Path) -> Result<VendorDataProduct, ImportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let product = match extension.as_deref() {
            Some("yaml") | Some("yml") => self.import_yaml(&content)?,
            _ => self.import_json(&content)?,
        };

        info!(
            "Loaded data product '{}' with {} output port(s) from {}",
            product.name,
            product.output_ports.len(),
            path.display()
        );
        Ok(product)
    }

    /// Map an already parsed JSON document
    pub fn import_value(&self, value: &JsonValue) -> Result<VendorDataProduct, ImportError> {
        self.parse_data_product(value)
            .map_err(|e| ImportError::MalformedInput(format!("{:#}", e)))
    }

    fn parse_data_product(&self, json: &JsonValue) -> Result<VendorDataProduct> {
        let obj = json
            .as_object()
            .ok_or_else(|| anyhow!("Data product document must be an object"))?;

        let output_ports = self.parse_output_ports(obj)?;
        let schema = match obj.get("schema") {
            None | Some(JsonValue::Null) => None,
            Some(schema) => Some(self.parse_schema(schema).context("Invalid field: schema")?),
        };

        let additional_properties: Map<String, JsonValue> = obj
            .iter()
            .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !additional_properties.is_empty() {
            debug!(
                "Carrying {} additional top-level field(s) as custom properties",
                additional_properties.len()
            );
        }

        Ok(VendorDataProduct {
            data_product_id: required_str(obj, "dataProductId")?,
            name: required_str(obj, "name")?,
            description: required_str(obj, "description")?,
            version: required_str(obj, "version")?,
            domain: required_str(obj, "domain")?,
            data_alignment_type: required_str(obj, "dataAlignmentType")?,
            source_systems: required_str_list(obj, "sourceSystems")?,
            processing: required_str(obj, "processing")?,
            framework: required_str(obj, "framework")?,
            data_contract: required_str(obj, "dataContract")?,
            slas: required_str(obj, "SLAs")?,
            use_cases: required_str_list(obj, "useCases")?,
            subject_matter_experts: required_str_list(obj, "subjectMatterExperts")?,
            country_of_origin: required_str_list(obj, "countryOfOrigin")?,
            data_classification: required_str(obj, "dataClassification")?,
            compliance_requirements: required_str_list(obj, "complianceRequirements")?,
            acceptable_use: required_str(obj, "acceptableUse")?,
            created_by: required_str(obj, "createdBy")?,
            last_modified: required_str(obj, "lastModified")?,
            update_frequency: required_str(obj, "updateFrequency")?,
            output_ports,
            schema,
            additional_properties,
        })
    }

    /// Parse the `outputPorts` array
    fn parse_output_ports(&self, obj: &Map<String, JsonValue>) -> Result<Vec<OutputPort>> {
        let ports = obj
            .get("outputPorts")
            .ok_or_else(|| anyhow!("Missing required field: outputPorts"))?
            .as_array()
            .ok_or_else(|| anyhow!("Field outputPorts must be an array"))?;

        ports
            .iter()
            .enumerate()
            .map(|(index, port)| {
                self.parse_output_port(port)
                    .with_context(|| format!("Invalid output port at index {}", index))
            })
            .collect()
    }

    fn parse_output_port(&self, json: &JsonValue) -> Result<OutputPort> {
        let obj = json
            .as_object()
            .ok_or_else(|| anyhow!("Output port must be an object"))?;

        let details = obj
            .get("details")
            .ok_or_else(|| anyhow!("Missing required field: details"))?
            .as_object()
            .ok_or_else(|| anyhow!("Field details must be an object"))?;

        Ok(OutputPort {
            r#type: required_str(obj, "type")?,
            description: required_str(obj, "description")?,
            details: OutputPortDetails {
                catalog: required_str(details, "catalog")?,
                schema: required_str(details, "schema")?,
                table: required_str(details, "table")?,
                env: required_str(details, "env")?,
            },
        })
    }

    /// Parse the schema block with its `properties` and `x-context` maps
    fn parse_schema(&self, json: &JsonValue) -> Result<VendorSchema> {
        let obj = json
            .as_object()
            .ok_or_else(|| anyhow!("Schema must be an object"))?;

        let mut properties = Vec::new();
        if let Some(props) = optional_object(obj, "properties")? {
            for (name, prop) in props {
                let prop_obj = prop
                    .as_object()
                    .ok_or_else(|| anyhow!("Schema property '{}' must be an object", name))?;
                properties.push(SchemaPropertyBasic {
                    name: name.clone(),
                    r#type: optional_str(prop_obj, "type")?.unwrap_or_default(),
                    description: optional_str(prop_obj, "description")?.unwrap_or_default(),
                });
            }
        }

        let mut annotations = BTreeMap::new();
        if let Some(context) = optional_object(obj, "x-context")? {
            for (name, annotation) in context {
                let annotation = self
                    .parse_annotation(annotation)
                    .with_context(|| format!("Invalid x-context entry '{}'", name))?;
                annotations.insert(name.clone(), annotation);
            }
        }

        Ok(VendorSchema {
            properties,
            annotations,
        })
    }

    fn parse_annotation(&self, json: &JsonValue) -> Result<SchemaPropertyAnnotation> {
        let obj = json
            .as_object()
            .ok_or_else(|| anyhow!("Annotation must be an object"))?;

        Ok(SchemaPropertyAnnotation {
            property_uri: optional_str(obj, "propertyUri")?.unwrap_or_default(),
            relation_type: optional_str(obj, "relationType")?.unwrap_or_default(),
            required: optional_bool(obj, "required")?.unwrap_or(false),
            is_primary_id: optional_bool(obj, "isPrimaryId")?.unwrap_or(false),
            compliance_requirements: optional_str_list(obj, "complianceRequirements")?
                .unwrap_or_default(),
            transformations: optional_str_list(obj, "transformations")?.unwrap_or_default(),
        })
    }
}

fn required_str(obj: &Map<String, JsonValue>, key: &str) -> Result<String> {
    optional_str(obj, key)?.ok_or_else(|| anyhow!("Missing required field: {}", key))
}

fn optional_str(obj: &Map<String, JsonValue>, key: &str) -> Result<Option<String>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(anyhow!(
            "Field {} must be a string, found {}",
            key,
            json_type_name(other)
        )),
    }
}

fn required_str_list(obj: &Map<String, JsonValue>, key: &str) -> Result<Vec<String>> {
    optional_str_list(obj, key)?.ok_or_else(|| anyhow!("Missing required field: {}", key))
}

fn optional_str_list(obj: &Map<String, JsonValue>, key: &str) -> Result<Option<Vec<String>>> {
    let items = match obj.get(key) {
        None | Some(JsonValue::Null) => return Ok(None),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(anyhow!(
                "Field {} must be an array of strings, found {}",
                key,
                json_type_name(other)
            ));
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow!("Field {} must only contain strings", key))
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn optional_bool(obj: &Map<String, JsonValue>, key: &str) -> Result<Option<bool>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(anyhow!(
            "Field {} must be a boolean, found {}",
            key,
            json_type_name(other)
        )),
    }
}

fn optional_object<'a>(
    obj: &'a Map<String, JsonValue>,
    key: &str,
) -> Result<Option<&'a Map<String, JsonValue>>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Object(map)) => Ok(Some(map)),
        Some(other) => Err(anyhow!(
            "Field {} must be an object, found {}",
            key,
            json_type_name(other)
        )),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
