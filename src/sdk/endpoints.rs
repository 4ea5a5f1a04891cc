//! Resource endpoints built on the fetcher.
//!
//! Each handle only shapes the request; filtering, pagination and rendering
//! are done by the API.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::fetcher::{CacheMode, FetchError, Fetcher, RequestOptions};
use crate::domain::{Author, Category, ItemEnvelope, ListEnvelope, Post, Tag};

/// Percent-encode a slug so it stays a single path segment
fn slug_segment(slug: &str) -> String {
    urlencoding::encode(slug).into_owned()
}

fn default_limit() -> u32 {
    20
}

/// Parameters for `posts.list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostListParams {
    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default)]
    pub offset: u32,

    #[serde(default)]
    pub cache: CacheMode,

    /// Category slug
    #[serde(default)]
    pub category: Option<String>,

    /// Tag slugs, sent comma-joined
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Author slug
    #[serde(default)]
    pub author: Option<String>,
}

impl Default for PostListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
            cache: CacheMode::Default,
            category: None,
            tags: None,
            author: None,
        }
    }
}

impl PostListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Form-encoded query string; absent or empty filters are left out
    pub fn query_string(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &self.limit.to_string());
        query.append_pair("offset", &self.offset.to_string());

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query.append_pair("category", category);
        }
        if let Some(tags) = self.tags.as_ref().filter(|t| !t.is_empty()) {
            query.append_pair("tags", &tags.join(","));
        }
        if let Some(author) = self.author.as_deref().filter(|a| !a.is_empty()) {
            query.append_pair("author", author);
        }

        query.finish()
    }
}

/// Per-call options for single-resource fetches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetOptions {
    pub cache: CacheMode,
}

impl GetOptions {
    pub fn with_cache(cache: CacheMode) -> Self {
        Self { cache }
    }
}

/// `posts` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Posts<'a> {
    pub(crate) fetcher: &'a Fetcher,
}

impl Posts<'_> {
    /// `GET posts?limit&offset[&category][&tags][&author]`
    pub async fn list(&self, params: PostListParams) -> Result<ListEnvelope<Post>, FetchError> {
        let path = format!("posts?{}", params.query_string());
        self.fetcher
            .fetch(&path, RequestOptions::get().with_cache(params.cache))
            .await
    }

    /// `GET posts/{slug}`
    pub async fn get(&self, slug: &str, opts: GetOptions) -> Result<ItemEnvelope<Post>, FetchError> {
        self.fetcher
            .fetch(&format!("posts/{}", slug_segment(slug)), RequestOptions::get().with_cache(opts.cache))
            .await
    }
}

/// `categories` endpoint
#[derive(Debug, Clone, Copy)]
pub struct Categories<'a> {
    pub(crate) fetcher: &'a Fetcher,
}

impl Categories<'_> {
    pub async fn list(&self) -> Result<ListEnvelope<Category>, FetchError> {
        self.fetcher.fetch("categories", RequestOptions::get()).await
    }
}

/// `tags` endpoint
#[derive(Debug, Clone, Copy)]
pub struct Tags<'a> {
    pub(crate) fetcher: &'a Fetcher,
}

impl Tags<'_> {
    pub async fn list(&self) -> Result<ListEnvelope<Tag>, FetchError> {
        self.fetcher.fetch("tags", RequestOptions::get()).await
    }
}

/// `authors` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Authors<'a> {
    pub(crate) fetcher: &'a Fetcher,
}

impl Authors<'_> {
    pub async fn list(&self) -> Result<ListEnvelope<Author>, FetchError> {
        self.fetcher.fetch("authors", RequestOptions::get()).await
    }

    /// `GET authors/{slug}`
    pub async fn get(&self, slug: &str, opts: GetOptions) -> Result<ItemEnvelope<Author>, FetchError> {
        self.fetcher
            .fetch(&format!("authors/{}", slug_segment(slug)), RequestOptions::get().with_cache(opts.cache))
            .await
    }
}
