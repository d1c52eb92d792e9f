//! Schema property normalization
//!
//! Joins the `properties` map of a vendor schema with its parallel
//! `x-context` annotations into [`NormalizedSchemaProperty`] records.

use crate::models::{NormalizedSchemaProperty, VendorDataProduct, VendorSchema};
use crate::urn::make_term_urn;

/// Error during schema normalization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("Schema property '{property}' has no matching x-context annotation")]
    AnnotationMissing { property: String },
}

/// Join every schema property with its annotation, in property order.
///
/// Fails on the first property without an annotation; no partial list is
/// returned. Annotations without a property are ignored.
pub fn normalize(schema: &VendorSchema) -> Result<Vec<NormalizedSchemaProperty>, NormalizeError> {
    schema
        .properties
        .iter()
        .map(|basic| {
            let annotation = schema.annotations.get(&basic.name).ok_or_else(|| {
                NormalizeError::AnnotationMissing {
                    property: basic.name.clone(),
                }
            })?;

            Ok(NormalizedSchemaProperty {
                name: basic.name.clone(),
                description: basic.description.clone(),
                r#type: basic.r#type.clone(),
                property_uri: annotation.property_uri.clone(),
                relation_type: annotation.relation_type.clone(),
                required: annotation.required,
                is_primary_id: annotation.is_primary_id,
                compliance_requirements: annotation.compliance_requirements.clone(),
                transformations: annotation.transformations.clone(),
            })
        })
        .collect()
}

/// Normalized schema properties of a data product; empty without a schema
pub fn normalize_data_product(
    product: &VendorDataProduct,
) -> Result<Vec<NormalizedSchemaProperty>, NormalizeError> {
    match &product.schema {
        Some(schema) => normalize(schema),
        None => Ok(Vec::new()),
    }
}

/// Copies of `properties` whose URI points at the catalog's glossary page
/// for the derived term, e.g. `http://localhost:9002/glossaryTerm/urn:li:glossaryTerm:email`.
pub fn patch_property_uri_for_display(
    properties: &[NormalizedSchemaProperty],
    catalog_base_url: &str,
) -> Vec<NormalizedSchemaProperty> {
    let base = catalog_base_url.trim_end_matches('/');
    properties
        .iter()
        .map(|property| NormalizedSchemaProperty {
            property_uri: format!(
                "{}/glossaryTerm/{}",
                base,
                make_term_urn(&property.term().term_id)
            ),
            ..property.clone()
        })
        .collect()
}
