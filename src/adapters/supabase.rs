//! Supabase adapter for the image bucket and the `blog_images` table.
//!
//! Storage: `{url}/storage/v1/object/...`
//! Table: PostgREST at `{url}/rest/v1/{table}`
//! Auth: `apikey` header plus Bearer token (same key)

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{ListOptions, MediaTable, ObjectStorage};
use crate::domain::{BlogImageRow, NewBlogImage, StorageObject};

/// Default bucket holding uploaded images
pub const DEFAULT_BUCKET: &str = "images";

/// Default table of externally hosted images
pub const DEFAULT_TABLE: &str = "blog_images";

const IMAGE_COLUMNS: &str = "id,file_url,file_name,created_at,size_in_bytes";

/// Supabase REST client
pub struct SupabaseClient {
    /// Project URL, e.g. `https://xyz.supabase.co`
    url: String,
    /// API key (anon or service role)
    key: String,
    bucket: String,
    table: String,
    /// Log each request (method and URL)
    debug: bool,
    client: reqwest::Client,
}

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct StorageErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
    #[serde(rename = "sortBy")]
    sort_by: SortBy<'a>,
}

#[derive(Debug, Serialize)]
struct SortBy<'a> {
    column: &'a str,
    order: super::SortOrder,
}

#[derive(Debug, Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: String,
}

impl SupabaseClient {
    /// Create a new client for the default bucket and table
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            table: DEFAULT_TABLE.to_string(),
            debug: false,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    fn log_request(&self, method: &str, url: &str) {
        if self.debug {
            info!(target: "zenblog", "fetch {} {}", method, url);
        }
    }

    /// Build a storage API URL
    fn storage_url(&self, suffix: &str) -> String {
        format!("{}/storage/v1/{}", self.url, suffix)
    }

    /// Build a PostgREST URL for the image table
    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.url, self.table)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder.header("apikey", &self.key).bearer_auth(&self.key)
    }

    /// Turn a non-success storage response into an error
    async fn storage_error(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StorageErrorBody>(&text)
            .ok()
            .and_then(|body| body.message.or(body.error))
            .unwrap_or(text);
        anyhow::anyhow!("Storage API error ({}): {}", status, message)
    }
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn list(&self, prefix: &str, options: &ListOptions) -> Result<Vec<StorageObject>> {
        let url = self.storage_url(&format!("object/list/{}", self.bucket));
        let body = ListRequest {
            prefix,
            limit: options.limit,
            offset: options.offset,
            sort_by: SortBy {
                column: &options.sort_column,
                order: options.sort_order,
            },
        };

        self.log_request("POST", &url);
        let response = self
            .authed(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .context("Failed to list storage objects")?;

        if !response.status().is_success() {
            return Err(Self::storage_error(response).await);
        }

        response
            .json()
            .await
            .context("Failed to parse storage listing")
    }

    async fn upload(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<String> {
        let url = self.storage_url(&format!("object/{}/{}", self.bucket, path));
        debug!(%url, bytes = body.len(), "Uploading object");
        self.log_request("POST", &url);

        let response = self
            .authed(self.client.post(&url))
            .header("Content-Type", content_type)
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await
            .context("Failed to upload object")?;

        if !response.status().is_success() {
            return Err(Self::storage_error(response).await);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .context("Failed to parse upload response")?;
        Ok(uploaded.key)
    }

    async fn remove(&self, paths: &[String]) -> Result<()> {
        let url = self.storage_url(&format!("object/{}", self.bucket));
        self.log_request("DELETE", &url);

        let response = self
            .authed(self.client.delete(&url))
            .json(&RemoveRequest { prefixes: paths })
            .send()
            .await
            .context("Failed to remove storage objects")?;

        if !response.status().is_success() {
            return Err(Self::storage_error(response).await);
        }

        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        self.storage_url(&format!("object/public/{}/{}", self.bucket, path))
    }
}

#[async_trait]
impl MediaTable for SupabaseClient {
    async fn select_for_blog(&self, blog_id: &str) -> Result<Vec<BlogImageRow>> {
        let url = self.table_url();
        self.log_request("GET", &url);

        let response = self
            .authed(self.client.get(&url))
            .query(&[("select", IMAGE_COLUMNS.to_string()), ("blog_id", format!("eq.{}", blog_id))])
            .send()
            .await
            .context("Failed to query image table")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Image table error ({}): {}", status, text);
        }

        response
            .json()
            .await
            .context("Failed to parse image table rows")
    }

    async fn insert(&self, image: &NewBlogImage) -> Result<BlogImageRow> {
        let url = self.table_url();
        self.log_request("POST", &url);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=representation")
            .query(&[("select", IMAGE_COLUMNS)])
            .json(image)
            .send()
            .await
            .context("Failed to insert image row")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Image table error ({}): {}", status, text);
        }

        let mut rows: Vec<BlogImageRow> = response
            .json()
            .await
            .context("Failed to parse inserted image row")?;

        rows.pop().context("Insert returned no rows")
    }
}
