//! Locations API client
//!
//! Fetches the feed once from `GET {api_base_url}/locations` and rewrites
//! relative image paths against the image host.

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::feed::{LocationsResponse, Post};
use async_trait::async_trait;

/// Anything the feed can be loaded from
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Fetch every post. Errors carry a message suitable for display.
    async fn fetch_locations(&self) -> Result<Vec<Post>>;
}

/// HTTP client for the locations endpoint
#[derive(Debug, Clone)]
pub struct LocationsClient {
    client: reqwest::Client,
    api_base_url: String,
    image_base_url: String,
}

impl LocationsClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn locations_url(&self) -> String {
        format!("{}/locations", self.api_base_url)
    }

    /// Prefix a relative image path with the image host; absolute URLs pass through
    pub fn resolve_image(&self, image: &str) -> String {
        if image.starts_with("http://") || image.starts_with("https://") {
            return image.to_string();
        }
        if image.starts_with('/') {
            format!("{}{}", self.image_base_url, image)
        } else {
            format!("{}/{}", self.image_base_url, image)
        }
    }
}

#[async_trait]
impl LocationSource for LocationsClient {
    async fn fetch_locations(&self) -> Result<Vec<Post>> {
        let url = self.locations_url();
        tracing::info!(url = %url, "Fetching locations");

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Locations request failed: {}", e);
            Error::Load("Failed to fetch locations".to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Locations endpoint returned an error");
            return Err(Error::Load(format!(
                "Failed to fetch locations (HTTP {})",
                status.as_u16()
            )));
        }

        let body: LocationsResponse = response.json().await.map_err(|e| {
            tracing::warn!("Invalid locations payload: {}", e);
            Error::Load("Failed to read locations".to_string())
        })?;

        let posts: Vec<Post> = body
            .locations
            .into_iter()
            .map(|mut post| {
                post.images = post.images.iter().map(|i| self.resolve_image(i)).collect();
                post
            })
            .collect();

        tracing::info!(count = posts.len(), "Loaded locations");
        Ok(posts)
    }
}

/// Fixed in-memory source
#[async_trait]
impl LocationSource for Vec<Post> {
    async fn fetch_locations(&self) -> Result<Vec<Post>> {
        Ok(self.clone())
    }
}
