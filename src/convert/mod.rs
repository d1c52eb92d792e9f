//! Conversion functionality
//!
//! Turns parsed vendor structures into the normalized forms the change
//! record generator works with.

pub mod schema_properties;

pub use schema_properties::{
    NormalizeError, normalize, normalize_data_product, patch_property_uri_for_display,
};
