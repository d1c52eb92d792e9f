//! Normalized schema property models

use serde::{Deserialize, Serialize};

use crate::urn::{make_term_urn, uri_path_segments};

/// A schema property joined with its `x-context` annotation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSchemaProperty {
    pub name: String,
    pub description: String,
    pub r#type: String,
    pub property_uri: String,
    pub relation_type: String,
    pub required: bool,
    pub is_primary_id: bool,
    pub compliance_requirements: Vec<String>,
    pub transformations: Vec<String>,
}

impl NormalizedSchemaProperty {
    /// Glossary term identity derived from the property URI
    pub fn term(&self) -> TermIdentity {
        TermIdentity::from_uri(&self.property_uri)
    }

    pub fn term_urn(&self) -> String {
        self.term().urn()
    }
}

/// Glossary term derived from a property URI
///
/// For `https://ontology.org/terms/customer/email` the name is `email`,
/// the browse path `["terms", "customer"]` and the id `email`. Segments
/// are percent-decoded; a decoded `/` inside the last segment becomes `_`
/// in the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermIdentity {
    pub term_id: String,
    pub term_name: String,
    pub browse_path: Vec<String>,
}

impl TermIdentity {
    pub fn from_uri(property_uri: &str) -> Self {
        let mut segments = uri_path_segments(property_uri);
        // split always yields at least one element
        let term_name = segments.pop().unwrap_or_default();

        Self {
            term_id: term_name.replace('/', "_"),
            term_name,
            browse_path: segments,
        }
    }

    pub fn urn(&self) -> String {
        make_term_urn(&self.term_id)
    }
}
