//! Core traits for sift components.
//!
//! [`SearchBackend`] is the seam between query composition and transport:
//! everything up to the composed request body is pure and synchronous,
//! everything from the network call on lives behind this trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreError;
use crate::types::Document;

/// Trait for executing a composed request body against a search backend.
///
/// Implementations own transport concerns (connections, auth, retries) and
/// response parsing into [`Document`] records. The body handed in is a
/// complete, backend-valid query document; implementations must not modify
/// it.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Execute a search request against the given index.
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Document>, StoreError>;

    /// Index (upsert) documents.
    async fn write_documents(&self, index: &str, docs: &[Document]) -> Result<u64, StoreError>;

    /// Number of documents in the index.
    async fn count_documents(&self, index: &str) -> Result<u64, StoreError>;
}
