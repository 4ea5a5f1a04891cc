//! zenblog - Client SDK and media toolkit for the Zenblog headless CMS
//!
//! Two surfaces share this crate:
//! - A typed client for the public content API (posts, categories, tags,
//!   authors), built on a single fetcher that shapes requests and normalizes
//!   responses and errors
//! - A media library that merges the storage bucket and the external image
//!   table into one list, and routes uploads and deletions to the backend
//!   that owns each item
//!
//! # Modules
//!
//! - `sdk`: Public API client (`ZenblogClient`, `Fetcher`)
//! - `core`: Media reconciliation and mutations (`MediaLibrary`, `QueryCache`)
//! - `adapters`: Backend integrations (Supabase, dashboard API)
//! - `domain`: Data structures (Post, MediaItem, MediaRef)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # List the newest posts tagged rust
//! zenblog --blog <blog-id> posts list --tags rust --limit 5
//!
//! # List a blog's media across both backends
//! zenblog --blog <blog-id> media list
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod sdk;

// Re-export main types at crate root for convenience
pub use crate::core::{DeletionReport, MediaError, MediaLibrary, QueryCache, QueryKey};
pub use domain::{Hosting, MediaItem, MediaRef};
pub use sdk::{ClientOptions, FetchError, PostListParams, ZenblogClient};
