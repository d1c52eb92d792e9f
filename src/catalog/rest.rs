//! REST catalog backend
//!
//! Talks to the catalog's metadata service over HTTP using a blocking
//! client. Existence checks read the entity's key aspect; change records
//! are posted to the ingestion endpoints.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::wire::{self, WireRequest};
use super::{CatalogError, Emitter, EntityOracle};
use crate::config::CatalogSection;
use crate::models::ChangeRecord;
use crate::urn::entity_type_of;

const RESTLI_PROTOCOL_HEADER: &str = "X-RestLi-Protocol-Version";
const RESTLI_PROTOCOL_VERSION: &str = "2.0.0";

/// Catalog client for the metadata service REST API
#[derive(Debug, Clone)]
pub struct RestCatalog {
    client: Client,
    server: String,
    token: Option<String>,
}

impl RestCatalog {
    /// Creates a client from the catalog configuration section.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not an http(s) url or the HTTP
    /// client cannot be constructed.
    pub fn new(config: &CatalogSection) -> Result<Self, CatalogError> {
        let server = validate_server(&config.server)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            server,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(RESTLI_PROTOCOL_HEADER, RESTLI_PROTOCOL_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, CatalogError> {
        self.authorize(request)
            .send()
            .map_err(|e| CatalogError::Transport(e.to_string()))
    }
}

fn validate_server(raw: &str) -> Result<String, CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidServer {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim_end_matches('/').to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

fn error_for_status(response: Response) -> CatalogError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            CatalogError::Unauthorized(format!("{}: {}", status, body))
        }
        _ => CatalogError::Status {
            status: status.as_u16(),
            body,
        },
    }
}

impl EntityOracle for RestCatalog {
    fn exists(&self, urn: &str) -> Result<bool, CatalogError> {
        let entity_type =
            entity_type_of(urn).ok_or_else(|| CatalogError::InvalidUrn(urn.to_string()))?;
        let url = format!(
            "{}/aspects/{}?aspect={}Key&version=0",
            self.server,
            urlencoding::encode(urn),
            entity_type
        );

        let response = self.send(self.client.get(&url))?;
        match response.status() {
            status if status.is_success() => {
                debug!("{} exists in catalog", urn);
                Ok(true)
            }
            StatusCode::NOT_FOUND => {
                debug!("{} not found in catalog", urn);
                Ok(false)
            }
            _ => Err(error_for_status(response)),
        }
    }
}

impl Emitter for RestCatalog {
    fn emit(&self, record: &ChangeRecord) -> Result<(), CatalogError> {
        let (url, body) = match wire::encode(record)? {
            WireRequest::Proposal(body) => {
                (format!("{}/aspects?action=ingestProposal", self.server), body)
            }
            WireRequest::Snapshot(body) => (format!("{}/entities?action=ingest", self.server), body),
        };

        let response = self.send(self.client.post(&url).json(&body))?;
        if response.status().is_success() {
            debug!(
                "Emitted {} for {}",
                record.aspect_name(),
                record.entity_urn
            );
            Ok(())
        } else {
            Err(error_for_status(response))
        }
    }
}
