//! Artwork lookup against the public Digimon API

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_IMAGE_API_URL: &str = "https://digimon-api.vercel.app";

/// Resolves a Digimon name to an image URL
#[async_trait]
pub trait ImageLookup: Send + Sync {
    /// `None` when nothing matches or the lookup failed
    async fn find_image(&self, name: &str) -> Option<String>;
}

/// Lookup that never finds anything, used when the external API is disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct NoImageLookup;

#[async_trait]
impl ImageLookup for NoImageLookup {
    async fn find_image(&self, _name: &str) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ApiDigimon {
    name: String,
    #[serde(default)]
    img: Option<String>,
}

/// Client for `digimon-api.vercel.app`
///
/// Tries the exact-name endpoint first, then scans the full list for a
/// case-insensitive partial match.
#[derive(Debug, Clone)]
pub struct DigimonApiClient {
    client: Client,
    base_url: String,
}

impl DigimonApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn exact_match(&self, name: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!(
            "{}/api/digimon/name/{}",
            self.base_url,
            urlencoding::encode(name)
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            debug!("No exact image match for '{}': {}", name, response.status());
            return Ok(None);
        }

        // Unknown names come back as an error object rather than an array
        let body: serde_json::Value = response.json().await?;
        let entries: Vec<ApiDigimon> = serde_json::from_value(body).unwrap_or_default();
        Ok(entries.into_iter().next().and_then(|d| non_empty(d.img)))
    }

    async fn similar_match(&self, name: &str) -> Result<Option<String>, reqwest::Error> {
        let url = format!("{}/api/digimon", self.base_url);
        let entries: Vec<ApiDigimon> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(find_similar(&entries, name))
    }
}

#[async_trait]
impl ImageLookup for DigimonApiClient {
    async fn find_image(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        match self.exact_match(name).await {
            Ok(Some(url)) => return Some(url),
            Ok(None) => {}
            Err(e) => warn!("Exact image lookup for '{}' failed: {}", name, e),
        }

        match self.similar_match(name).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Image search for '{}' failed: {}", name, e);
                None
            }
        }
    }
}

fn find_similar(entries: &[ApiDigimon], name: &str) -> Option<String> {
    let query = name.to_lowercase();
    entries
        .iter()
        .find(|d| {
            let candidate = d.name.to_lowercase();
            candidate.contains(&query) || query.contains(&candidate)
        })
        .and_then(|d| non_empty(d.img.clone()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}
