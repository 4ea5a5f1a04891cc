//! Adapter interfaces for the media backends.
//!
//! The dashboard keeps media in two places:
//! - an object storage bucket (`ObjectStorage`)
//! - a table of externally hosted images (`MediaTable`), whose files are
//!   deleted through the dashboard API (`ImageHost`)

pub mod dashboard;
pub mod supabase;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{BlogImageRow, NewBlogImage, StorageObject};

// Re-export the concrete adapters
pub use dashboard::DashboardClient;
pub use supabase::SupabaseClient;

/// Sort order for bucket listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Options for listing objects under a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
    /// Column to sort by (`name`, `created_at`, ...)
    pub sort_column: String,
    pub sort_order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            offset: 0,
            sort_column: "name".to_string(),
            sort_order: SortOrder::Asc,
        }
    }
}

impl ListOptions {
    /// Newest first
    pub fn newest_first() -> Self {
        Self {
            sort_column: "created_at".to_string(),
            sort_order: SortOrder::Desc,
            ..Default::default()
        }
    }
}

/// Object storage bucket
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// List objects directly under `prefix`
    async fn list(&self, prefix: &str, options: &ListOptions) -> Result<Vec<StorageObject>>;

    /// Upload a new object; returns its key
    async fn upload(&self, path: &str, body: Vec<u8>, content_type: &str) -> Result<String>;

    /// Remove objects in one call
    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Public URL for an object path
    fn public_url(&self, path: &str) -> String;
}

/// Table of externally hosted images
#[async_trait]
pub trait MediaTable: Send + Sync {
    async fn select_for_blog(&self, blog_id: &str) -> Result<Vec<BlogImageRow>>;

    async fn insert(&self, image: &NewBlogImage) -> Result<BlogImageRow>;
}

/// Host of externally stored image files
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Delete files by name for one blog
    async fn delete_images(&self, blog_id: &str, file_names: &[String]) -> Result<()>;
}
