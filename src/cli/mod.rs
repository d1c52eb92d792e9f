//! CLI support
//!
//! Command handlers shared by the `dataproduct-cli` binary and its tests.

pub mod commands;
pub mod error;

pub use commands::upsert::{UpsertArgs, UpsertSummary, handle_upsert, preview_upsert};
pub use error::CliError;
