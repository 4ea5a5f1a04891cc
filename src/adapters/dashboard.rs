//! Dashboard API client for externally hosted images.
//!
//! Endpoint: DELETE {base}/v2/blogs/{blog_id}/images
//! Body: `{ "fileNames": [...] }`, expects HTTP 200

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tracing::{error, info};

use super::ImageHost;

/// Default dashboard API base
pub const DEFAULT_DASHBOARD_URL: &str = "https://zenblog.com/api";

/// Dashboard API client
pub struct DashboardClient {
    base_url: String,
    /// Session token, sent as Bearer auth when present
    token: Option<String>,
    /// Log each request (method and URL)
    debug: bool,
    client: reqwest::Client,
}

/// Payload for bulk image deletion
#[derive(Debug, Serialize)]
pub struct DeleteImagesPayload<'a> {
    #[serde(rename = "fileNames")]
    pub file_names: &'a [String],
}

impl DashboardClient {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            debug: false,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Build the images URL for a blog
    fn images_url(&self, blog_id: &str) -> String {
        format!("{}/v2/blogs/{}/images", self.base_url, blog_id)
    }
}

/// Only HTTP 200 counts as a deletion; anything else logs the body and fails
fn check_delete_response(status: reqwest::StatusCode, body: &str, blog_id: &str) -> Result<()> {
    if status != reqwest::StatusCode::OK {
        error!(%status, %body, blog_id, "Image deletion rejected");
        anyhow::bail!("Failed to delete image");
    }
    Ok(())
}

#[async_trait]
impl ImageHost for DashboardClient {
    async fn delete_images(&self, blog_id: &str, file_names: &[String]) -> Result<()> {
        let url = self.images_url(blog_id);
        if self.debug {
            info!(target: "zenblog", "fetch DELETE {}", url);
        }

        let mut request = self
            .client
            .delete(url)
            .json(&DeleteImagesPayload { file_names });

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach dashboard API")?;

        let status = response.status();
        let body = if status == reqwest::StatusCode::OK {
            String::new()
        } else {
            response.text().await.unwrap_or_default()
        };

        check_delete_response(status, &body, blog_id)
    }
}
