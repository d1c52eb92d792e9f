//! Change record generation
//!
//! Produces the ordered change records for one data product:
//!
//! 1. domain (only if absent)
//! 2. per output port: dataset properties and schema metadata (only if absent)
//! 3. data product properties
//! 4. data product domain
//! 5. data product ownership
//! 6. data product status
//! 7. schema annotation blob
//! 8. per schema property: glossary term snapshot and term domain (only if absent)
//!
//! Records are produced lazily by [`ChangeRecordStream`]. The oracle is
//! queried when a step is reached, so a caller that emits each record
//! before pulling the next one sees its own writes. The first error ends
//! the stream.

use chrono::Utc;
use serde_json::json;
use std::collections::VecDeque;
use tracing::{debug, info};

use crate::catalog::{CatalogError, EntityOracle};
use crate::config::{ConnectorConfig, DEFAULT_AUDIT_ACTOR, DEFAULT_FRONTEND_URL};
use crate::convert::{NormalizeError, normalize_data_product, patch_property_uri_for_display};
use crate::models::*;
use crate::urn::{
    DATABRICKS_PLATFORM, make_data_platform_urn, make_data_product_urn, make_domain_urn,
    make_user_urn,
};

/// Placeholder written to new glossary terms
pub const TERM_DEFINITION_PLACEHOLDER: &str =
    "*PUT THE DEFINITION HERE*, **you can use** MD markup language";

/// Aspect name of the schema annotation blob
pub const SCHEMA_ASPECT_NAME: &str = "esDataProductSchema";

/// Top-level key of the schema annotation blob
pub const SCHEMA_PROPERTIES_KEY: &str = "esDataProductSchemaProperties";

/// Audit message attached to schema field term associations
pub const TERM_ASSOCIATION_AUDIT_MESSAGE: &str = "json";

/// Error during change record generation
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Knobs for change record generation
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Catalog web UI base url, used for glossary term links in the blob
    pub frontend_url: String,
    /// Written to the data product properties when set
    pub external_url: Option<String>,
    pub audit_actor: String,
    /// Audit stamp time; the current time when unset
    pub audit_time_millis: Option<i64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            external_url: None,
            audit_actor: DEFAULT_AUDIT_ACTOR.to_string(),
            audit_time_millis: None,
        }
    }
}

impl GenerateOptions {
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            frontend_url: config.frontend.base_url.clone(),
            audit_actor: config.ingestion.audit_actor.clone(),
            ..Default::default()
        }
    }

    pub fn with_external_url(mut self, external_url: Option<String>) -> Self {
        self.external_url = external_url;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Domain,
    Dataset(usize),
    ProductProperties,
    ProductDomains,
    Ownership,
    Status,
    SchemaBlob,
    Term(usize),
    Done,
}

/// Lazy, pull-based sequence of change records for one data product
pub struct ChangeRecordStream<'a, O: EntityOracle> {
    product: &'a VendorDataProduct,
    properties: &'a [NormalizedSchemaProperty],
    oracle: O,
    options: GenerateOptions,
    audit_time: i64,
    product_urn: String,
    domain_urn: String,
    stage: Stage,
    pending: VecDeque<ChangeRecord>,
}

/// Start generating change records for `product`
pub fn generate<'a, O: EntityOracle>(
    product: &'a VendorDataProduct,
    properties: &'a [NormalizedSchemaProperty],
    oracle: O,
    options: GenerateOptions,
) -> ChangeRecordStream<'a, O> {
    ChangeRecordStream::new(product, properties, oracle, options)
}

/// Normalize the schema of `product` and collect every change record
pub fn generate_for_product<O: EntityOracle>(
    product: &VendorDataProduct,
    oracle: O,
    options: GenerateOptions,
) -> Result<Vec<ChangeRecord>, GenerateError> {
    let properties = normalize_data_product(product)?;
    generate(product, &properties, oracle, options).collect()
}

impl<'a, O: EntityOracle> ChangeRecordStream<'a, O> {
    pub fn new(
        product: &'a VendorDataProduct,
        properties: &'a [NormalizedSchemaProperty],
        oracle: O,
        options: GenerateOptions,
    ) -> Self {
        let audit_time = options
            .audit_time_millis
            .unwrap_or_else(|| Utc::now().timestamp_millis());

        Self {
            product_urn: make_data_product_urn(&product.data_product_id),
            domain_urn: make_domain_urn(&product.domain),
            product,
            properties,
            oracle,
            options,
            audit_time,
            stage: Stage::Domain,
            pending: VecDeque::new(),
        }
    }

    /// Urn of the data product the records are generated for
    pub fn product_urn(&self) -> &str {
        &self.product_urn
    }

    /// Run the current stage, queue its records and move to the next one
    fn advance(&mut self) -> Result<(), GenerateError> {
        self.stage = match self.stage {
            Stage::Domain => {
                self.domain_records()?;
                Stage::Dataset(0)
            }
            Stage::Dataset(index) if index < self.product.output_ports.len() => {
                let product = self.product;
                self.dataset_records(&product.output_ports[index])?;
                Stage::Dataset(index + 1)
            }
            Stage::Dataset(_) => Stage::ProductProperties,
            Stage::ProductProperties => {
                self.push_product_aspect(self.product_properties());
                Stage::ProductDomains
            }
            Stage::ProductDomains => {
                self.push_product_aspect(Aspect::Domains(Domains {
                    domains: vec![self.domain_urn.clone()],
                }));
                Stage::Ownership
            }
            Stage::Ownership => {
                self.push_product_aspect(self.ownership());
                Stage::Status
            }
            Stage::Status => {
                self.push_product_aspect(Aspect::Status(Status { removed: false }));
                Stage::SchemaBlob
            }
            Stage::SchemaBlob => {
                self.schema_blob_record()?;
                Stage::Term(0)
            }
            Stage::Term(index) if index < self.properties.len() => {
                let properties = self.properties;
                self.term_records(&properties[index])?;
                Stage::Term(index + 1)
            }
            Stage::Term(_) | Stage::Done => Stage::Done,
        };
        Ok(())
    }

    fn domain_records(&mut self) -> Result<(), GenerateError> {
        if self.oracle.exists(&self.domain_urn)? {
            debug!("Domain {} already exists", self.domain_urn);
            return Ok(());
        }

        info!("Creating domain {}", self.domain_urn);
        self.pending.push_back(ChangeRecord::aspect(
            EntityType::Domain,
            self.domain_urn.clone(),
            Aspect::DomainProperties(DomainProperties {
                name: self.product.domain.clone(),
            }),
        ));
        Ok(())
    }

    fn dataset_records(&mut self, port: &OutputPort) -> Result<(), GenerateError> {
        let dataset_urn = port.urn();
        if self.oracle.exists(&dataset_urn)? {
            debug!("Dataset {} already exists", dataset_urn);
            return Ok(());
        }

        info!("Creating dataset {}", dataset_urn);
        let fully_qualified_name = port.fully_qualified_name();

        self.pending.push_back(ChangeRecord::aspect(
            EntityType::Dataset,
            dataset_urn.clone(),
            Aspect::DatasetProperties(DatasetProperties {
                name: fully_qualified_name.clone(),
                custom_properties: self.product.custom_properties(),
            }),
        ));

        let fields = self
            .properties
            .iter()
            .map(|property| self.schema_field(property))
            .collect();

        self.pending.push_back(ChangeRecord::aspect(
            EntityType::Dataset,
            dataset_urn,
            Aspect::SchemaMetadata(SchemaMetadata {
                schema_name: format!("schema_{}", fully_qualified_name),
                platform: make_data_platform_urn(DATABRICKS_PLATFORM),
                version: 0,
                hash: String::new(),
                platform_schema: PlatformSchema::OtherSchema {
                    raw_schema: String::new(),
                },
                fields,
            }),
        ));
        Ok(())
    }

    fn schema_field(&self, property: &NormalizedSchemaProperty) -> SchemaField {
        SchemaField {
            field_path: property.name.clone(),
            r#type: SchemaFieldDataType {
                r#type: FieldDataType::Null {},
            },
            description: String::new(),
            native_data_type: property.r#type.clone(),
            nullable: false,
            recursive: false,
            glossary_terms: Some(GlossaryTerms {
                terms: vec![GlossaryTermAssociation {
                    urn: property.term_urn(),
                }],
                audit_stamp: AuditStamp::new(
                    self.audit_time,
                    self.options.audit_actor.clone(),
                    TERM_ASSOCIATION_AUDIT_MESSAGE,
                ),
            }),
        }
    }

    fn product_properties(&self) -> Aspect {
        Aspect::DataProductProperties(DataProductProperties {
            name: self.product.name.clone(),
            description: self.product.description.clone(),
            assets: self
                .product
                .dataset_urns()
                .into_iter()
                .map(|destination_urn| DataProductAssociation { destination_urn })
                .collect(),
            custom_properties: self.product.custom_properties(),
            external_url: self.options.external_url.clone(),
        })
    }

    fn ownership(&self) -> Aspect {
        Aspect::Ownership(Ownership {
            owners: self
                .product
                .subject_matter_experts
                .iter()
                .map(|expert| Owner {
                    owner: make_user_urn(expert),
                    r#type: OwnershipType::BusinessOwner,
                })
                .collect(),
            last_modified: AuditStamp::unknown(),
        })
    }

    fn push_product_aspect(&mut self, aspect: Aspect) {
        debug!("Upserting {} on {}", aspect.name(), self.product_urn);
        self.pending.push_back(ChangeRecord::aspect(
            EntityType::DataProduct,
            self.product_urn.clone(),
            aspect,
        ));
    }

    fn schema_blob_record(&mut self) -> Result<(), GenerateError> {
        let patched = patch_property_uri_for_display(self.properties, &self.options.frontend_url);
        let properties = serde_json::to_value(&patched)
            .map_err(|e| GenerateError::SerializationError(e.to_string()))?;

        self.pending.push_back(ChangeRecord::generic_json(
            EntityType::DataProduct,
            self.product_urn.clone(),
            SCHEMA_ASPECT_NAME,
            json!({ SCHEMA_PROPERTIES_KEY: properties }),
        ));
        Ok(())
    }

    fn term_records(&mut self, property: &NormalizedSchemaProperty) -> Result<(), GenerateError> {
        let term = property.term();
        let term_urn = term.urn();
        if self.oracle.exists(&term_urn)? {
            debug!("Glossary term {} already exists", term_urn);
            return Ok(());
        }

        info!(
            "Creating glossary term {} for property '{}'",
            term_urn, property.name
        );
        self.pending.push_back(ChangeRecord::snapshot(
            EntityType::GlossaryTerm,
            term_urn.clone(),
            vec![
                Aspect::GlossaryTermInfo(GlossaryTermInfo {
                    name: term.term_name,
                    definition: TERM_DEFINITION_PLACEHOLDER.to_string(),
                    term_source: TERM_DEFINITION_PLACEHOLDER.to_string(),
                }),
                Aspect::BrowsePaths(BrowsePaths {
                    paths: term.browse_path,
                }),
            ],
        ));
        self.pending.push_back(ChangeRecord::aspect(
            EntityType::GlossaryTerm,
            term_urn,
            Aspect::Domains(Domains {
                domains: vec![self.domain_urn.clone()],
            }),
        ));
        Ok(())
    }
}

impl<O: EntityOracle> Iterator for ChangeRecordStream<'_, O> {
    type Item = Result<ChangeRecord, GenerateError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.stage == Stage::Done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.stage = Stage::Done;
                return Some(Err(e));
            }
        }
    }
}

impl<O: EntityOracle> std::iter::FusedIterator for ChangeRecordStream<'_, O> {}
