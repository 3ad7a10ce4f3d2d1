//! Octopus Deploy HTTP client

use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{BuildInfoError, Result};
use crate::payload::BuildInformationRecord;
use crate::publish::{BuildInformationClient, OverwriteMode};

const API_KEY_HEADER: &str = "X-Octopus-ApiKey";
const USER_AGENT: &str = concat!("push-build-info/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SpaceResource {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SpaceCollection {
    items: Vec<SpaceResource>,
}

/// Client for the Octopus Deploy REST API
pub struct OctopusClient {
    http_client: Client,
    server_url: String,
    api_key: String,
}

impl OctopusClient {
    /// Create a client for `server_url` authenticating with `api_key`
    pub fn new(server_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| BuildInfoError::remote(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self::with_http_client(http_client, server_url, api_key))
    }

    /// Create a client on top of an already configured HTTP client
    pub fn with_http_client(http_client: Client, server_url: &str, api_key: &str) -> Self {
        OctopusClient {
            http_client,
            server_url: server_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Look up the id of the space called `name` (case-insensitive)
    pub fn resolve_space_id(&self, name: &str) -> Result<String> {
        let url = format!("{}/api/spaces", self.server_url);
        tracing::debug!(%url, space = name, "Resolving space id");

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("partialName", name), ("take", "2147483647")])
            .send()
            .map_err(|e| BuildInfoError::remote(format!("Space lookup failed: {}", e)))?;

        let spaces: SpaceCollection = check_status(response, "Space lookup")?
            .json()
            .map_err(|e| BuildInfoError::remote(format!("Cannot parse space list: {}", e)))?;

        find_space_id(&spaces.items, name)
            .ok_or_else(|| BuildInfoError::remote(format!("Space '{}' not found", name)))
    }
}

impl BuildInformationClient for OctopusClient {
    fn push(&self, record: &BuildInformationRecord, mode: OverwriteMode) -> Result<()> {
        let space_id = self.resolve_space_id(&record.space)?;
        let url = format!("{}/api/{}/build-information", self.server_url, space_id);
        tracing::debug!(%url, %mode, "Submitting build information");

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(&[("overwriteMode", mode.as_api_str())])
            .json(record)
            .send()
            .map_err(|e| BuildInfoError::remote(format!("Build information push failed: {}", e)))?;

        check_status(response, "Build information push")?;
        Ok(())
    }
}

fn find_space_id(spaces: &[SpaceResource], name: &str) -> Option<String> {
    spaces
        .iter()
        .find(|space| space.name.eq_ignore_ascii_case(name))
        .map(|space| space.id.clone())
}

fn check_status(response: Response, action: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    Err(BuildInfoError::remote(format!(
        "{} returned {}: {}",
        action,
        status,
        body.trim()
    )))
}
