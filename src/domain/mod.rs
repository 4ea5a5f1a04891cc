//! Domain types for the Zenblog client.
//!
//! This module contains the core data structures:
//! - Content: Posts, categories, tags and authors from the public API
//! - Media: Bucket objects, image table rows and the merged media view

pub mod content;
pub mod media;

// Re-export commonly used types
pub use content::{Author, Category, ItemEnvelope, ListEnvelope, Post, Tag};
pub use media::{
    BlogImageRow, Hosting, MediaItem, MediaRef, NewBlogImage, StorageObject,
    StorageObjectMetadata,
};
