//! CLI command implementations

pub mod upsert;
