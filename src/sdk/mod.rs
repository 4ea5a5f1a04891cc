//! Client for the public Zenblog content API.
//!
//! ```rust,ignore
//! use zenblog::sdk::{ClientOptions, PostListParams, ZenblogClient};
//!
//! let client = ZenblogClient::new(ClientOptions::new("my-blog-id"))?;
//! let posts = client.posts().list(PostListParams::new().tags(["rust"])).await?;
//! ```

pub mod endpoints;
pub mod fetcher;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use endpoints::{Authors, Categories, GetOptions, PostListParams, Posts, Tags};
pub use fetcher::{
    BoxError, CacheMode, FetchError, Fetcher, HttpRequest, HttpTransport, RawResponse,
    RequestOptions, ReqwestTransport,
};

/// Production endpoint of the public API
pub const DEFAULT_API_URL: &str = "https://zenblog.com/api/public";

/// Options accepted by [`ZenblogClient::new`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientOptions {
    pub blog_id: String,

    /// Overrides [`DEFAULT_API_URL`]
    #[serde(default)]
    pub url: Option<String>,

    /// Log every request (method and URL)
    #[serde(default)]
    pub debug: bool,
}

impl ClientOptions {
    pub fn new(blog_id: impl Into<String>) -> Self {
        Self {
            blog_id: blog_id.into(),
            url: None,
            debug: false,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Typed client for one blog
#[derive(Debug, Clone)]
pub struct ZenblogClient {
    fetcher: Fetcher,
}

impl ZenblogClient {
    /// Create a client that talks to the API over `reqwest`
    pub fn new(options: ClientOptions) -> Result<Self, FetchError> {
        Self::with_transport(options, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client with a custom transport
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, FetchError> {
        warn_if_browser();

        let url = options.url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let fetcher = Fetcher::new(url, options.blog_id, options.debug, transport)?;

        Ok(Self { fetcher })
    }

    pub fn blog_id(&self) -> &str {
        self.fetcher.blog_id()
    }

    pub fn base_url(&self) -> &str {
        self.fetcher.base_url()
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts {
            fetcher: &self.fetcher,
        }
    }

    pub fn categories(&self) -> Categories<'_> {
        Categories {
            fetcher: &self.fetcher,
        }
    }

    pub fn tags(&self) -> Tags<'_> {
        Tags {
            fetcher: &self.fetcher,
        }
    }

    pub fn authors(&self) -> Authors<'_> {
        Authors {
            fetcher: &self.fetcher,
        }
    }

    /// Raw access to the fetcher for paths without a typed endpoint
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        opts: RequestOptions,
    ) -> Result<T, FetchError> {
        self.fetcher.fetch(path, opts).await
    }
}

/// One-time advisory when compiled for the browser
fn warn_if_browser() {
    #[cfg(target_arch = "wasm32")]
    {
        static WARNED: std::sync::Once = std::sync::Once::new();
        WARNED.call_once(|| {
            tracing::warn!(
                "Looks like you're trying to use Zenblog in the browser. This is not advised. \
                 We recommend using server-side rendering frameworks to fetch data."
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let client = ZenblogClient::new(ClientOptions::new("blog-1")).unwrap();
        assert_eq!(client.base_url(), DEFAULT_API_URL);
        assert_eq!(client.blog_id(), "blog-1");
    }

    #[test]
    fn test_url_override() {
        let client =
            ZenblogClient::new(ClientOptions::new("blog-1").with_url("http://localhost:3000/api"))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[test]
    fn test_debug_off_by_default() {
        let options = ClientOptions::new("blog-1");
        assert!(!options.debug);
    }

    #[test]
    fn test_missing_blog_id() {
        let err = ZenblogClient::new(ClientOptions::default()).unwrap_err();
        assert!(matches!(err, FetchError::Validation(_)));
    }
}
