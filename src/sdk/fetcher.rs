//! Request building and response normalization for the public API.
//!
//! Every endpoint call goes through [`Fetcher::fetch`], which:
//! - Builds `{url}/blogs/{blog_id}/{path}`
//! - Merges caller headers over `Content-Type: application/json`
//! - Always parses the body as JSON before looking at the status
//! - Maps failures onto [`FetchError`], logging them before returning

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Boxed error used for transport failures so the original error survives
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by the SDK
#[derive(Debug, Error)]
pub enum FetchError {
    /// Missing or malformed identifiers, raised before any request
    #[error("Validation error: {0}")]
    Validation(String),

    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response body was not the JSON we expected
    #[error("{message} (HTTP {status}): {source}")]
    Parse {
        message: &'static str,
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with a non-2xx status
    #[error("Error fetching data from API: HTTP {}", .response.status)]
    Api { response: RawResponse },
}

impl FetchError {
    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Parse { status, .. } => Some(*status),
            FetchError::Api { response } => Some(response.status),
            FetchError::Validation(_) | FetchError::Transport(_) => None,
        }
    }
}

/// Cache behaviour requested for a call, mirroring the fetch cache modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    #[default]
    Default,
    NoStore,
    Reload,
    NoCache,
    ForceCache,
    OnlyIfCached,
}

impl CacheMode {
    /// `Cache-Control` request directive for this mode
    pub fn cache_control(self) -> Option<&'static str> {
        match self {
            CacheMode::Default => None,
            CacheMode::NoStore => Some("no-store"),
            CacheMode::Reload | CacheMode::NoCache => Some("no-cache"),
            CacheMode::ForceCache => Some("max-stale"),
            CacheMode::OnlyIfCached => Some("only-if-cached"),
        }
    }
}

impl std::fmt::Display for CacheMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CacheMode::Default => "default",
            CacheMode::NoStore => "no-store",
            CacheMode::Reload => "reload",
            CacheMode::NoCache => "no-cache",
            CacheMode::ForceCache => "force-cache",
            CacheMode::OnlyIfCached => "only-if-cached",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for CacheMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "default" => Ok(CacheMode::Default),
            "no-store" => Ok(CacheMode::NoStore),
            "reload" => Ok(CacheMode::Reload),
            "no-cache" => Ok(CacheMode::NoCache),
            "force-cache" => Ok(CacheMode::ForceCache),
            "only-if-cached" => Ok(CacheMode::OnlyIfCached),
            _ => anyhow::bail!("Unknown cache mode: {}", s),
        }
    }
}

/// Caller-supplied options for a single request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub cache: CacheMode,
    /// Extra headers; these override the defaults
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            cache: CacheMode::Default,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A fully built request, ready for a transport
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response kept for caller inspection on API errors
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends built requests over the wire
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, BoxError>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<RawResponse, BoxError> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

/// Default headers first, then caller headers replacing same-named ones
pub(crate) fn merge_headers(
    defaults: &[(&str, &str)],
    overrides: &[(String, String)],
) -> Vec<(String, String)> {
    let mut merged: Vec<(String, String)> = defaults
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for (name, value) in overrides {
        merged.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        merged.push((name.clone(), value.clone()));
    }

    merged
}

/// Request builder and response normalizer scoped to one blog
#[derive(Clone)]
pub struct Fetcher {
    base_url: String,
    blog_id: String,
    debug: bool,
    transport: Arc<dyn HttpTransport>,
}

impl Fetcher {
    pub fn new(
        base_url: impl Into<String>,
        blog_id: impl Into<String>,
        debug: bool,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, FetchError> {
        let blog_id = blog_id.into();
        if blog_id.trim().is_empty() {
            return Err(FetchError::Validation("Blog ID is required".to_string()));
        }

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            base_url,
            blog_id,
            debug,
            transport,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Full URL for a path relative to the blog
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/blogs/{}/{}", self.base_url, self.blog_id, path)
    }

    /// Fetch `path` and deserialize the JSON body
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<T, FetchError> {
        let result = self.fetch_inner(path, opts).await;
        if let Err(e) = &result {
            error!("[Zenblog Error] {}", e);
        }
        result
    }

    fn build_request(&self, path: &str, opts: RequestOptions) -> Result<HttpRequest, FetchError> {
        let mut defaults = vec![("Content-Type", "application/json")];
        if let Some(directive) = opts.cache.cache_control() {
            defaults.push(("Cache-Control", directive));
        }

        let body = opts
            .body
            .map(|b| serde_json::to_vec(&b))
            .transpose()
            .map_err(|e| FetchError::Validation(format!("Unserializable request body: {}", e)))?;

        Ok(HttpRequest {
            method: opts.method,
            url: self.url_for(path),
            headers: merge_headers(&defaults, &opts.headers),
            body,
        })
    }

    async fn fetch_inner<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<T, FetchError> {
        let request = self.build_request(path, opts)?;

        if self.debug {
            info!(target: "zenblog", "fetch {} {}", request.method, request.url);
        }

        let response = self
            .transport
            .send(request)
            .await
            .map_err(FetchError::Transport)?;

        let json: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|source| FetchError::Parse {
                message: "Failed to parse JSON response from API",
                status: response.status,
                source,
            })?;

        if !response.is_success() {
            return Err(FetchError::Api { response });
        }

        serde_json::from_value(json).map_err(|source| FetchError::Parse {
            message: "Unexpected response shape from API",
            status: response.status,
            source,
        })
    }
}

impl std::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fetcher")
            .field("base_url", &self.base_url)
            .field("blog_id", &self.blog_id)
            .field("debug", &self.debug)
            .finish()
    }
}
