//! Hosted search-index collaborator.
//!
//! The index structure and ranking are owned entirely by the external
//! service; this module only speaks its request/response contract.

pub mod client;
pub mod memory;
mod types;

use async_trait::async_trait;

use crate::core::errors::ApiError;

pub use client::AzureSearchIndex;
pub use memory::InMemoryIndex;
pub use types::{IndexedSegment, SegmentHit};

/// Seam over the hosted segment index.
#[async_trait]
pub trait SegmentIndex: Send + Sync {
    /// Create the index with the fixed schema if it does not exist.
    /// Returns `true` when the index was created by this call.
    async fn ensure_index(&self) -> Result<bool, ApiError>;

    /// Upload one batch of segments.
    async fn upload(&self, segments: Vec<IndexedSegment>) -> Result<usize, ApiError>;

    /// Text query returning the top-k scored segments, ordered by the
    /// service's ranking.
    async fn search(&self, query: &str, top: usize) -> Result<Vec<SegmentHit>, ApiError>;
}
