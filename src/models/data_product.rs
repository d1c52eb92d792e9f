//! Vendor data product models
//!
//! Typed representation of the vendor "data product" JSON document: the
//! product record itself, its output ports and the optional schema block
//! with its parallel `properties` / `x-context` maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::urn::{DATABRICKS_PLATFORM, make_dataset_urn};

/// Top-level keys that never flow into the custom-property map.
pub const EXCLUDED_CUSTOM_PROPERTY_KEYS: [&str; 3] = ["schema", "outputPorts", "dataProductId"];

/// Vendor data product record
///
/// Constructed once per invocation by the importer and never mutated
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VendorDataProduct {
    /// Opaque identifier, usually a URI
    pub data_product_id: String,
    pub name: String,
    pub description: String,
    pub version: String,
    /// Business domain name
    pub domain: String,
    pub data_alignment_type: String,
    pub source_systems: Vec<String>,
    pub processing: String,
    pub framework: String,
    pub data_contract: String,
    #[serde(rename = "SLAs")]
    pub slas: String,
    pub use_cases: Vec<String>,
    /// Subject matter experts, emitted as business owners
    pub subject_matter_experts: Vec<String>,
    pub country_of_origin: Vec<String>,
    pub data_classification: String,
    pub compliance_requirements: Vec<String>,
    pub acceptable_use: String,
    pub created_by: String,
    pub last_modified: String,
    pub update_frequency: String,
    pub output_ports: Vec<OutputPort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<VendorSchema>,
    /// Top-level fields not covered above, in document order
    #[serde(flatten)]
    pub additional_properties: serde_json::Map<String, serde_json::Value>,
}

impl VendorDataProduct {
    /// Every descriptive top-level attribute rendered as a string.
    ///
    /// Strings are carried verbatim, everything else is JSON encoded. The
    /// raw schema block, the output ports and the product id are left out.
    pub fn custom_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();

        let scalars = [
            ("name", &self.name),
            ("description", &self.description),
            ("version", &self.version),
            ("domain", &self.domain),
            ("dataAlignmentType", &self.data_alignment_type),
            ("processing", &self.processing),
            ("framework", &self.framework),
            ("dataContract", &self.data_contract),
            ("SLAs", &self.slas),
            ("dataClassification", &self.data_classification),
            ("acceptableUse", &self.acceptable_use),
            ("createdBy", &self.created_by),
            ("lastModified", &self.last_modified),
            ("updateFrequency", &self.update_frequency),
        ];
        for (key, value) in scalars {
            properties.insert(key.to_string(), value.clone());
        }

        let lists = [
            ("sourceSystems", &self.source_systems),
            ("useCases", &self.use_cases),
            ("subjectMatterExperts", &self.subject_matter_experts),
            ("countryOfOrigin", &self.country_of_origin),
            ("complianceRequirements", &self.compliance_requirements),
        ];
        for (key, values) in lists {
            properties.insert(key.to_string(), serde_json::Value::from(values.clone()).to_string());
        }

        for (key, value) in &self.additional_properties {
            if EXCLUDED_CUSTOM_PROPERTY_KEYS.contains(&key.as_str()) {
                continue;
            }
            let rendered = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            properties.insert(key.clone(), rendered);
        }

        properties
    }

    /// Dataset urns of all output ports, in port order
    pub fn dataset_urns(&self) -> Vec<String> {
        self.output_ports.iter().map(OutputPort::urn).collect()
    }
}

/// One physical dataset exposed by the data product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputPort {
    pub r#type: String,
    pub description: String,
    pub details: OutputPortDetails,
}

/// Platform locator of an output port
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputPortDetails {
    pub catalog: String,
    pub schema: String,
    pub table: String,
    pub env: String,
}

impl OutputPort {
    /// `catalog.schema.table`
    pub fn fully_qualified_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.details.catalog, self.details.schema, self.details.table
        )
    }

    pub fn urn(&self) -> String {
        make_dataset_urn(
            DATABRICKS_PLATFORM,
            &self.fully_qualified_name(),
            &self.details.env,
        )
    }
}

/// Schema block of the vendor document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VendorSchema {
    /// Basic property definitions in document order
    pub properties: Vec<SchemaPropertyBasic>,
    /// Annotations from the `x-context` map, keyed by property name
    #[serde(rename = "x-context")]
    pub annotations: BTreeMap<String, SchemaPropertyAnnotation>,
}

/// Entry of the `properties` map
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaPropertyBasic {
    /// Map key the entry was found under
    pub name: String,
    pub r#type: String,
    pub description: String,
}

/// Entry of the `x-context` map
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPropertyAnnotation {
    /// URI naming the business concept behind the property
    pub property_uri: String,
    pub relation_type: String,
    pub required: bool,
    pub is_primary_id: bool,
    pub compliance_requirements: Vec<String>,
    pub transformations: Vec<String>,
}
