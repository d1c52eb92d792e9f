//! Tests for change record generation

use dataproduct_connector::catalog::{CatalogError, Emitter, EntityOracle, InMemoryCatalog};
use dataproduct_connector::convert::normalize_data_product;
use dataproduct_connector::generate::{
    GenerateError, GenerateOptions, SCHEMA_ASPECT_NAME, SCHEMA_PROPERTIES_KEY,
    TERM_DEFINITION_PLACEHOLDER, generate, generate_for_product,
};
use dataproduct_connector::import::DataProductImporter;
use dataproduct_connector::models::*;
use serde_json::{Value, json};

const FIXTURE: &str = include_str!("fixtures/customer_360.json");

const PRODUCT_URN: &str = "urn:li:dataProduct:products_customer_360";
const DOMAIN_URN: &str = "urn:li:domain:customer";
const PROD_DATASET_URN: &str =
    "urn:li:dataset:(urn:li:dataPlatform:databricks,main.customer.customer_360,PROD)";
const DEV_DATASET_URN: &str =
    "urn:li:dataset:(urn:li:dataPlatform:databricks,dev.customer.customer_360,DEV)";

fn minimal_document() -> Value {
    json!({
        "dataProductId": "https://example.com/products/orders",
        "name": "Orders",
        "description": "Order facts",
        "version": "1.0.0",
        "domain": "sales",
        "dataAlignmentType": "source-aligned",
        "sourceSystems": ["erp"],
        "processing": "streaming",
        "framework": "flink",
        "dataContract": "none",
        "SLAs": "hourly",
        "useCases": ["revenue"],
        "subjectMatterExperts": ["jdoe"],
        "countryOfOrigin": ["NL"],
        "dataClassification": "internal",
        "complianceRequirements": [],
        "acceptableUse": "internal",
        "createdBy": "jdoe",
        "lastModified": "2024-01-01",
        "updateFrequency": "hourly",
        "outputPorts": [{
            "type": "table",
            "description": "Orders table",
            "details": {"catalog": "main", "schema": "sales", "table": "orders", "env": "PROD"}
        }],
        "schema": {
            "properties": {"email": {"type": "string", "description": "Buyer email"}},
            "x-context": {"email": {"propertyUri": "https://ontology.org/customer/email"}}
        }
    })
}

fn import(value: &Value) -> VendorDataProduct {
    DataProductImporter::new()
        .import_json(&value.to_string())
        .unwrap()
}

fn fixture() -> VendorDataProduct {
    DataProductImporter::new().import_json(FIXTURE).unwrap()
}

fn options() -> GenerateOptions {
    GenerateOptions {
        audit_time_millis: Some(1_700_000_000_000),
        ..Default::default()
    }
}

fn summary(records: &[ChangeRecord]) -> Vec<(EntityType, String)> {
    records
        .iter()
        .map(|r| (r.entity_type, r.aspect_name().to_string()))
        .collect()
}

/// Oracle that fails for one urn and knows nothing else
struct FailingOracle {
    failing_urn: String,
}

impl EntityOracle for FailingOracle {
    fn exists(&self, urn: &str) -> Result<bool, CatalogError> {
        if urn == self.failing_urn {
            Err(CatalogError::Transport("connection refused".to_string()))
        } else {
            Ok(false)
        }
    }
}

#[test]
fn test_minimal_document_produces_ten_records_in_order() {
    let product = import(&minimal_document());
    let catalog = InMemoryCatalog::new();

    let records = generate_for_product(&product, &catalog, options()).unwrap();

    assert_eq!(
        summary(&records),
        vec![
            (EntityType::Domain, "domainProperties".to_string()),
            (EntityType::Dataset, "datasetProperties".to_string()),
            (EntityType::Dataset, "schemaMetadata".to_string()),
            (EntityType::DataProduct, "dataProductProperties".to_string()),
            (EntityType::DataProduct, "domains".to_string()),
            (EntityType::DataProduct, "ownership".to_string()),
            (EntityType::DataProduct, "status".to_string()),
            (EntityType::DataProduct, SCHEMA_ASPECT_NAME.to_string()),
            (EntityType::GlossaryTerm, "glossaryTermInfo".to_string()),
            (EntityType::GlossaryTerm, "domains".to_string()),
        ]
    );
    assert_eq!(records[0].entity_urn, "urn:li:domain:sales");
    assert_eq!(records[3].entity_urn, "urn:li:dataProduct:products_orders");
    assert_eq!(records[8].entity_urn, "urn:li:glossaryTerm:email");
}

#[test]
fn test_existing_domain_is_not_recreated() {
    let product = fixture();

    let absent = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();
    let domain_records: Vec<_> = absent
        .iter()
        .filter(|r| r.entity_type == EntityType::Domain)
        .collect();
    assert_eq!(domain_records.len(), 1);
    assert_eq!(absent[0].entity_urn, DOMAIN_URN);
    assert_eq!(
        absent[0].as_aspect(),
        Some(&Aspect::DomainProperties(DomainProperties {
            name: "customer".to_string()
        }))
    );

    let catalog = InMemoryCatalog::with_entities([DOMAIN_URN]);
    let present = generate_for_product(&product, &catalog, options()).unwrap();
    assert!(present.iter().all(|r| r.entity_type != EntityType::Domain));
    assert_eq!(present.len(), absent.len() - 1);
}

#[test]
fn test_existing_dataset_is_skipped() {
    let product = fixture();
    let catalog = InMemoryCatalog::with_entities([PROD_DATASET_URN]);

    let records = generate_for_product(&product, &catalog, options()).unwrap();
    let dataset_urns: Vec<&str> = records
        .iter()
        .filter(|r| r.entity_type == EntityType::Dataset)
        .map(|r| r.entity_urn.as_str())
        .collect();
    assert_eq!(dataset_urns, vec![DEV_DATASET_URN, DEV_DATASET_URN]);
}

#[test]
fn test_existing_term_is_skipped() {
    let product = fixture();
    let catalog = InMemoryCatalog::with_entities(["urn:li:glossaryTerm:email"]);

    let records = generate_for_product(&product, &catalog, options()).unwrap();
    let term_urns: Vec<&str> = records
        .iter()
        .filter(|r| r.entity_type == EntityType::GlossaryTerm)
        .map(|r| r.entity_urn.as_str())
        .collect();
    assert_eq!(
        term_urns,
        vec!["urn:li:glossaryTerm:customerId", "urn:li:glossaryTerm:customerId"]
    );
}

#[test]
fn test_oracle_is_queried_in_fixed_order() {
    let product = fixture();
    let catalog = InMemoryCatalog::with_entities([
        DOMAIN_URN,
        PROD_DATASET_URN,
        DEV_DATASET_URN,
        "urn:li:glossaryTerm:email",
        "urn:li:glossaryTerm:customerId",
    ]);

    let records = generate_for_product(&product, &catalog, options()).unwrap();
    assert_eq!(
        catalog.lookups(),
        vec![
            DOMAIN_URN,
            PROD_DATASET_URN,
            DEV_DATASET_URN,
            "urn:li:glossaryTerm:email",
            "urn:li:glossaryTerm:customerId",
        ]
    );
    // Only the always-upserted data product aspects remain
    assert_eq!(records.len(), 5);
    assert!(records.iter().all(|r| r.entity_urn == PRODUCT_URN));
}

#[test]
fn test_data_product_properties() {
    let product = fixture();
    let options = options().with_external_url(Some("https://wiki.example.com/c360".to_string()));
    let records = generate_for_product(&product, &InMemoryCatalog::new(), options).unwrap();

    let properties = records
        .iter()
        .find_map(|r| match r.as_aspect() {
            Some(Aspect::DataProductProperties(p)) => Some(p),
            _ => None,
        })
        .expect("data product properties record");

    assert_eq!(properties.name, "Customer 360");
    assert_eq!(
        properties.description,
        "Unified view of customers across channels"
    );
    let assets: Vec<&str> = properties
        .assets
        .iter()
        .map(|a| a.destination_urn.as_str())
        .collect();
    assert_eq!(assets, vec![PROD_DATASET_URN, DEV_DATASET_URN]);
    assert_eq!(
        properties.external_url,
        Some("https://wiki.example.com/c360".to_string())
    );

    let custom = &properties.custom_properties;
    for excluded in EXCLUDED_CUSTOM_PROPERTY_KEYS {
        assert!(!custom.contains_key(excluded), "{} must be excluded", excluded);
    }
    assert_eq!(custom.len(), 19);
    assert_eq!(custom["SLAs"], "daily by 06:00 UTC");
    assert_eq!(custom["domain"], "customer");
    assert_eq!(custom["sourceSystems"], r#"["crm","webshop"]"#);
    assert_eq!(custom["complianceRequirements"], r#"["GDPR"]"#);
}

#[test]
fn test_custom_properties_include_additional_fields() {
    let mut document = minimal_document();
    document["costCenter"] = json!("CC-1234");
    document["retentionDays"] = json!(365);
    let product = import(&document);

    let custom = product.custom_properties();
    assert_eq!(custom["costCenter"], "CC-1234");
    assert_eq!(custom["retentionDays"], "365");
    assert!(!custom.contains_key("schema"));
}

#[test]
fn test_dataset_records() {
    let product = fixture();
    let records = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();

    let Some(Aspect::DatasetProperties(dataset)) = records[1].as_aspect() else {
        panic!("expected dataset properties, got {:?}", records[1]);
    };
    assert_eq!(records[1].entity_urn, PROD_DATASET_URN);
    assert_eq!(dataset.name, "main.customer.customer_360");
    assert_eq!(dataset.custom_properties, product.custom_properties());

    let Some(Aspect::SchemaMetadata(schema)) = records[2].as_aspect() else {
        panic!("expected schema metadata, got {:?}", records[2]);
    };
    assert_eq!(schema.schema_name, "schema_main.customer.customer_360");
    assert_eq!(schema.platform, "urn:li:dataPlatform:databricks");
    assert_eq!(schema.version, 0);

    let paths: Vec<&str> = schema.fields.iter().map(|f| f.field_path.as_str()).collect();
    assert_eq!(paths, vec!["email", "customerId"]);
    assert_eq!(schema.fields[1].native_data_type, "bigint");

    let terms = schema.fields[0].glossary_terms.as_ref().unwrap();
    assert_eq!(terms.terms[0].urn, "urn:li:glossaryTerm:email");
    assert_eq!(terms.audit_stamp.time, 1_700_000_000_000);
    assert_eq!(terms.audit_stamp.actor, "urn:li:corpuser:datahub");
    assert_eq!(terms.audit_stamp.message.as_deref(), Some("json"));
}

#[test]
fn test_ownership_and_status() {
    let product = fixture();
    let records = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();

    let ownership = records
        .iter()
        .find_map(|r| match r.as_aspect() {
            Some(Aspect::Ownership(o)) => Some(o),
            _ => None,
        })
        .expect("ownership record");
    let owners: Vec<(&str, OwnershipType)> = ownership
        .owners
        .iter()
        .map(|o| (o.owner.as_str(), o.r#type))
        .collect();
    assert_eq!(
        owners,
        vec![
            ("urn:li:corpuser:jdoe", OwnershipType::BusinessOwner),
            ("urn:li:corpuser:asmith", OwnershipType::BusinessOwner),
        ]
    );

    let domains: Vec<&ChangeRecord> = records
        .iter()
        .filter(|r| r.entity_urn == PRODUCT_URN && r.aspect_name() == "domains")
        .collect();
    assert_eq!(domains.len(), 1);
    assert_eq!(
        domains[0].as_aspect(),
        Some(&Aspect::Domains(Domains {
            domains: vec![DOMAIN_URN.to_string()]
        }))
    );

    assert!(records.iter().any(|r| r.entity_urn == PRODUCT_URN
        && r.as_aspect() == Some(&Aspect::Status(Status { removed: false }))));
}

#[test]
fn test_schema_blob_uses_display_links() {
    let product = fixture();
    let options = GenerateOptions {
        frontend_url: "https://catalog.example.com".to_string(),
        ..options()
    };
    let records = generate_for_product(&product, &InMemoryCatalog::new(), options).unwrap();

    let blob = records
        .iter()
        .find(|r| r.aspect_name() == SCHEMA_ASPECT_NAME)
        .expect("schema blob record");
    let ChangePayload::Generic {
        content_type,
        value,
        ..
    } = &blob.payload
    else {
        panic!("expected a generic payload");
    };
    assert_eq!(content_type, JSON_CONTENT_TYPE);

    let properties = value[SCHEMA_PROPERTIES_KEY].as_array().unwrap();
    assert_eq!(properties.len(), 2);
    assert_eq!(properties[0]["name"], "email");
    assert_eq!(
        properties[0]["propertyUri"],
        "https://catalog.example.com/glossaryTerm/urn:li:glossaryTerm:email"
    );
    assert_eq!(properties[0]["complianceRequirements"], json!(["GDPR", "CCPA"]));
    assert_eq!(properties[1]["isPrimaryId"], json!(true));
}

#[test]
fn test_glossary_term_records() {
    let product = fixture();
    let records = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();

    let terms: Vec<&ChangeRecord> = records
        .iter()
        .filter(|r| r.entity_type == EntityType::GlossaryTerm)
        .collect();
    assert_eq!(terms.len(), 4);

    let ChangePayload::Snapshot(aspects) = &terms[0].payload else {
        panic!("expected a snapshot, got {:?}", terms[0]);
    };
    assert_eq!(
        aspects,
        &vec![
            Aspect::GlossaryTermInfo(GlossaryTermInfo {
                name: "email".to_string(),
                definition: TERM_DEFINITION_PLACEHOLDER.to_string(),
                term_source: TERM_DEFINITION_PLACEHOLDER.to_string(),
            }),
            Aspect::BrowsePaths(BrowsePaths {
                paths: vec!["terms".to_string(), "customer".to_string()],
            }),
        ]
    );
    assert_eq!(
        terms[1].as_aspect(),
        Some(&Aspect::Domains(Domains {
            domains: vec![DOMAIN_URN.to_string()]
        }))
    );
}

#[test]
fn test_missing_annotation_fails_before_any_record() {
    let mut document = minimal_document();
    document["schema"]["properties"]["age"] = json!({"type": "int"});
    let product = import(&document);

    let catalog = InMemoryCatalog::new();
    let result = generate_for_product(&product, &catalog, options());
    match result {
        Err(GenerateError::Normalize(e)) => assert!(e.to_string().contains("age")),
        other => panic!("expected a normalize error, got {:?}", other),
    }
    assert!(catalog.lookups().is_empty());
}

#[test]
fn test_oracle_failure_halts_generation() {
    let product = fixture();
    let properties = normalize_data_product(&product).unwrap();
    let oracle = FailingOracle {
        failing_urn: DEV_DATASET_URN.to_string(),
    };

    let mut stream = generate(&product, &properties, oracle, options());
    let mut produced = Vec::new();
    let mut error = None;
    for item in stream.by_ref() {
        match item {
            Ok(record) => produced.push(record),
            Err(e) => {
                error = Some(e);
                break;
            }
        }
    }

    // domain + first dataset group, then the failing check
    assert_eq!(produced.len(), 3);
    assert!(matches!(error, Some(GenerateError::Catalog(CatalogError::Transport(_)))));
    assert!(stream.next().is_none());
}

#[test]
fn test_without_schema_block() {
    let mut document = minimal_document();
    document.as_object_mut().unwrap().remove("schema");
    let product = import(&document);

    let records = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();
    assert_eq!(records.len(), 8);
    assert!(records.iter().all(|r| r.entity_type != EntityType::GlossaryTerm));

    let Some(Aspect::SchemaMetadata(schema)) = records[2].as_aspect() else {
        panic!("expected schema metadata");
    };
    assert!(schema.fields.is_empty());

    let ChangePayload::Generic { value, .. } = &records[7].payload else {
        panic!("expected schema blob");
    };
    assert_eq!(value, &json!({ SCHEMA_PROPERTIES_KEY: [] }));
}

#[test]
fn test_shared_term_identity_without_emission_repeats_term() {
    let mut document = minimal_document();
    document["schema"] = json!({
        "properties": {
            "billingEmail": {"type": "string"},
            "shippingEmail": {"type": "string"}
        },
        "x-context": {
            "billingEmail": {"propertyUri": "https://ontology.org/billing/email"},
            "shippingEmail": {"propertyUri": "https://ontology.org/shipping/email"}
        }
    });
    let product = import(&document);

    let records = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();
    let term_snapshots = records
        .iter()
        .filter(|r| matches!(r.payload, ChangePayload::Snapshot(_)))
        .count();
    assert_eq!(term_snapshots, 2);
}

#[test]
fn test_shared_term_identity_with_emission_creates_term_once() {
    let mut document = minimal_document();
    document["schema"] = json!({
        "properties": {
            "billingEmail": {"type": "string"},
            "shippingEmail": {"type": "string"}
        },
        "x-context": {
            "billingEmail": {"propertyUri": "https://ontology.org/billing/email"},
            "shippingEmail": {"propertyUri": "https://ontology.org/shipping/email"}
        }
    });
    let product = import(&document);
    let properties = normalize_data_product(&product).unwrap();
    let catalog = InMemoryCatalog::new();

    for record in generate(&product, &properties, &catalog, options()) {
        catalog.emit(&record.unwrap()).unwrap();
    }

    let term_snapshots = catalog
        .emitted()
        .iter()
        .filter(|r| matches!(r.payload, ChangePayload::Snapshot(_)))
        .count();
    assert_eq!(term_snapshots, 1);
    assert_eq!(
        catalog
            .lookups()
            .iter()
            .filter(|urn| urn.as_str() == "urn:li:glossaryTerm:email")
            .count(),
        2
    );
}

#[test]
fn test_generation_is_repeatable() {
    let product = fixture();
    let first = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();
    let second = generate_for_product(&product, &InMemoryCatalog::new(), options()).unwrap();
    assert_eq!(first, second);
}
