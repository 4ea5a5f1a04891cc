//! Core media logic.
//!
//! This module contains:
//! - MediaLibrary: Reconciliation query and backend-routed mutations
//! - QueryCache: Query results with prefix invalidation

pub mod media;
pub mod query_cache;

// Re-export commonly used types
pub use media::{sort_newest_first, DeletionPlan, DeletionReport, MediaError, MediaLibrary};
pub use query_cache::{QueryCache, QueryKey};
