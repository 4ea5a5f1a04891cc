//! Media records from the two storage backends.
//!
//! Bucket-hosted media lives in the storage bucket under `{blog_id}/{name}`.
//! Externally hosted media is tracked as rows in the `blog_images` table.
//! `MediaItem` is the merged view the dashboard works with.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which backend owns a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hosting {
    /// Object in the storage bucket
    Bucket,

    /// Row in the external image table
    External,
}

impl Hosting {
    pub fn from_supabase_hosted(flag: bool) -> Self {
        if flag {
            Hosting::Bucket
        } else {
            Hosting::External
        }
    }

    pub fn is_bucket(self) -> bool {
        self == Hosting::Bucket
    }
}

impl std::fmt::Display for Hosting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hosting::Bucket => write!(f, "bucket"),
            Hosting::External => write!(f, "external"),
        }
    }
}

// The dashboard speaks `supabase_hosted: bool`; a missing flag means external.
impl Serialize for Hosting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_bucket())
    }
}

impl<'de> Deserialize<'de> for Hosting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let flag = Option::<bool>::deserialize(deserializer)?;
        Ok(Hosting::from_supabase_hosted(flag.unwrap_or(false)))
    }
}

fn default_hosting() -> Hosting {
    Hosting::External
}

/// Normalized media entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,

    /// Public URL (table rows may not have one)
    pub url: Option<String>,

    pub name: String,

    /// ISO-8601 timestamp, used as the sort key
    pub created_at: String,

    #[serde(default)]
    pub size_in_bytes: Option<u64>,

    #[serde(rename = "supabase_hosted", default = "default_hosting")]
    pub hosting: Hosting,
}

impl MediaItem {
    /// Build an item from a bucket listing entry
    pub fn from_storage_object(object: StorageObject, public_url: String) -> Self {
        let size_in_bytes = object.metadata.as_ref().and_then(|m| m.size);
        Self {
            id: object.id.unwrap_or_else(|| object.name.clone()),
            url: Some(public_url),
            name: object.name,
            created_at: object.created_at.unwrap_or_default(),
            size_in_bytes,
            hosting: Hosting::Bucket,
        }
    }
}

impl From<BlogImageRow> for MediaItem {
    fn from(row: BlogImageRow) -> Self {
        Self {
            id: row.id.to_string(),
            url: row.file_url,
            name: row.file_name,
            created_at: row.created_at,
            size_in_bytes: row.size_in_bytes,
            hosting: Hosting::External,
        }
    }
}

/// Reference to a media item to delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Bucket path (`{blog_id}/{name}`) or external URL/path
    pub path: String,

    #[serde(rename = "supabase_hosted", default = "default_hosting")]
    pub hosting: Hosting,

    pub blog_id: String,
}

impl MediaRef {
    pub fn new(path: impl Into<String>, hosting: Hosting, blog_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            hosting,
            blog_id: blog_id.into(),
        }
    }

    /// Last `/`-separated segment of the path, if non-empty
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next().filter(|name| !name.is_empty())
    }
}

/// Entry from a storage bucket listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageObject {
    pub name: String,

    /// Folder placeholders have no id
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub metadata: Option<StorageObjectMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageObjectMetadata {
    #[serde(default)]
    pub size: Option<u64>,

    #[serde(default, rename = "mimetype")]
    pub mime_type: Option<String>,
}

/// Row of the `blog_images` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogImageRow {
    pub id: i64,

    #[serde(default)]
    pub file_url: Option<String>,

    pub file_name: String,

    pub created_at: String,

    #[serde(default)]
    pub size_in_bytes: Option<u64>,
}

/// Insert payload for the `blog_images` table
#[derive(Debug, Clone, Serialize)]
pub struct NewBlogImage {
    pub blog_id: String,
    pub file_url: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_in_bytes: Option<u64>,
}
