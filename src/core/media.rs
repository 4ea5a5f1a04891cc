//! Media library: one view over the bucket and the external image table.
//!
//! Reads merge both backends into a list sorted newest first. Writes go to
//! whichever backend owns each item and invalidate cached `["media"]` queries.

use std::sync::Arc;

use anyhow::Result as AnyResult;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::adapters::{ImageHost, ListOptions, MediaTable, ObjectStorage};
use crate::domain::{BlogImageRow, Hosting, MediaItem, MediaRef, NewBlogImage};

use super::query_cache::{QueryCache, QueryKey};

/// Errors from media queries and mutations
#[derive(Debug, Error)]
pub enum MediaError {
    /// Missing identifiers, raised before any backend call
    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("Image table error: {0:#}")]
    Table(anyhow::Error),

    #[error("Failed to delete image: {0:#}")]
    ImageHost(anyhow::Error),

    /// Both backends were attempted and at least one failed
    #[error(
        "Media deletion incomplete for blog {}: {}",
        .report.blog_id,
        describe_failures(.bucket_error.as_ref(), .external_error.as_ref())
    )]
    PartialDeletion {
        report: DeletionReport,
        bucket_error: Option<anyhow::Error>,
        external_error: Option<anyhow::Error>,
    },
}

fn describe_failures(bucket: Option<&anyhow::Error>, external: Option<&anyhow::Error>) -> String {
    let mut parts = Vec::new();
    if let Some(e) = bucket {
        parts.push(format!("bucket: {:#}", e));
    }
    if let Some(e) = external {
        parts.push(format!("external: {:#}", e));
    }
    parts.join("; ")
}

/// Validated deletion batch, split by backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    pub blog_id: String,
    /// Bucket object paths
    pub bucket_paths: Vec<String>,
    /// Bare file names of externally hosted images
    pub external_file_names: Vec<String>,
}

impl DeletionPlan {
    /// Validate and partition a batch. The first item's blog id is authoritative.
    pub fn from_refs(items: &[MediaRef]) -> Result<Self, MediaError> {
        let blog_id = items
            .first()
            .map(|item| item.blog_id.as_str())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| MediaError::Validation("Blog ID is required".to_string()))?;

        let mut bucket_paths = Vec::new();
        let mut external_file_names = Vec::new();

        for item in items {
            match item.hosting {
                Hosting::Bucket => bucket_paths.push(item.path.clone()),
                Hosting::External => {
                    if item.blog_id.is_empty() {
                        return Err(MediaError::Validation("Blog ID is required".to_string()));
                    }
                    let file_name = item.file_name().ok_or_else(|| {
                        MediaError::Validation(format!(
                            "File name is required (path: '{}')",
                            item.path
                        ))
                    })?;
                    external_file_names.push(file_name.to_string());
                }
            }
        }

        Ok(Self {
            blog_id: blog_id.to_string(),
            bucket_paths,
            external_file_names,
        })
    }
}

/// Outcome of a deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub blog_id: String,
    pub bucket_deleted: usize,
    pub external_deleted: usize,
}

impl DeletionReport {
    pub fn total(&self) -> usize {
        self.bucket_deleted + self.external_deleted
    }
}

/// Media queries and mutations over both backends
pub struct MediaLibrary {
    storage: Arc<dyn ObjectStorage>,
    table: Arc<dyn MediaTable>,
    images: Arc<dyn ImageHost>,
    cache: Arc<QueryCache<Vec<MediaItem>>>,
}

impl MediaLibrary {
    /// Create a library with its own cache
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        table: Arc<dyn MediaTable>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            storage,
            table,
            images,
            cache: Arc::new(QueryCache::new()),
        }
    }

    /// Share a cache with other consumers
    pub fn with_cache(mut self, cache: Arc<QueryCache<Vec<MediaItem>>>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<QueryCache<Vec<MediaItem>>> {
        &self.cache
    }

    /// Merged media list for a blog, served from cache when present
    pub async fn list_media(&self, blog_id: &str) -> Result<Vec<MediaItem>, MediaError> {
        let key = QueryKey::media(blog_id);
        let generation = self.cache.generation().await;
        if let Some(items) = self.cache.get(&key).await {
            debug!(%key, "Media list served from cache");
            return Ok(items);
        }

        let items = self.fetch_media(blog_id).await?;
        self.cache.insert_if_current(key, items.clone(), generation).await;
        Ok(items)
    }

    /// Merged media list for a blog, always read from the backends
    #[instrument(skip(self))]
    pub async fn fetch_media(&self, blog_id: &str) -> Result<Vec<MediaItem>, MediaError> {
        if blog_id.is_empty() {
            return Err(MediaError::Validation("Blog ID is required".to_string()));
        }

        let rows: Vec<BlogImageRow> = self
            .table
            .select_for_blog(blog_id)
            .await
            .map_err(MediaError::Table)?;

        let objects = self
            .storage
            .list(blog_id, &ListOptions::newest_first())
            .await
            .map_err(MediaError::Storage)?;

        let mut items: Vec<MediaItem> = objects
            .into_iter()
            .map(|object| {
                let url = self.storage.public_url(&format!("{}/{}", blog_id, object.name));
                MediaItem::from_storage_object(object, url)
            })
            .chain(rows.into_iter().map(MediaItem::from))
            .collect();

        sort_newest_first(&mut items);
        debug!(count = items.len(), "Fetched media");
        Ok(items)
    }

    /// Upload a file to the bucket at `path` (`{blog_id}/{name}`)
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    pub async fn upload_media(
        &self,
        path: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<String, MediaError> {
        let key = self
            .storage
            .upload(path, body, content_type)
            .await
            .map_err(MediaError::Storage)?;

        self.cache.invalidate(&QueryKey::media_root()).await;
        info!(%key, "Uploaded media");
        Ok(key)
    }

    /// Record an externally hosted image for a blog
    pub async fn register_external(&self, image: NewBlogImage) -> Result<MediaItem, MediaError> {
        if image.blog_id.is_empty() {
            return Err(MediaError::Validation("Blog ID is required".to_string()));
        }

        let row = self.table.insert(&image).await.map_err(MediaError::Table)?;
        self.cache.invalidate(&QueryKey::media_root()).await;
        Ok(MediaItem::from(row))
    }

    /// Delete a batch, routing each item to the backend that owns it
    #[instrument(skip(self, items), fields(count = items.len()))]
    pub async fn delete_media(&self, items: &[MediaRef]) -> Result<DeletionReport, MediaError> {
        let plan = DeletionPlan::from_refs(items)?;
        let mut report = DeletionReport {
            blog_id: plan.blog_id.clone(),
            ..Default::default()
        };

        let bucket_result: Option<AnyResult<()>> = if plan.bucket_paths.is_empty() {
            None
        } else {
            Some(self.storage.remove(&plan.bucket_paths).await)
        };

        let external_result: Option<AnyResult<()>> = if plan.external_file_names.is_empty() {
            None
        } else {
            Some(
                self.images
                    .delete_images(&plan.blog_id, &plan.external_file_names)
                    .await,
            )
        };

        let bucket_error = match bucket_result {
            Some(Ok(())) => {
                report.bucket_deleted = plan.bucket_paths.len();
                None
            }
            Some(Err(e)) => Some(e),
            None => None,
        };

        let external_error = match external_result {
            Some(Ok(())) => {
                report.external_deleted = plan.external_file_names.len();
                None
            }
            Some(Err(e)) => Some(e),
            None => None,
        };

        let attempted_both = !plan.bucket_paths.is_empty() && !plan.external_file_names.is_empty();

        // Anything removed makes cached lists stale, failure or not.
        if report.total() > 0 || (bucket_error.is_none() && external_error.is_none()) {
            self.cache.invalidate(&QueryKey::media_root()).await;
        }

        match (bucket_error, external_error) {
            (None, None) => {
                info!(
                    bucket = report.bucket_deleted,
                    external = report.external_deleted,
                    "Deleted media"
                );
                Ok(report)
            }
            (bucket_error, external_error) if attempted_both => {
                error!(
                    bucket_failed = bucket_error.is_some(),
                    external_failed = external_error.is_some(),
                    "Media deletion incomplete"
                );
                Err(MediaError::PartialDeletion {
                    report,
                    bucket_error,
                    external_error,
                })
            }
            (Some(e), None) => Err(MediaError::Storage(e)),
            (None, Some(e)) | (Some(_), Some(e)) => Err(MediaError::ImageHost(e)),
        }
    }
}

/// Newest first by `created_at` string comparison; ties keep their order
pub fn sort_newest_first(items: &mut [MediaItem]) {
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
