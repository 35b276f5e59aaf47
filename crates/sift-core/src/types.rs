//! Core types for sift.
//!
//! - [`Document`]: a retrievable record with content, embedding, and metadata

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Documents
// ============================================================================

/// A retrievable document.
///
/// Mirrors what the backend stores per record: textual content, an optional
/// embedding vector, and arbitrary JSON metadata used for filtering. The
/// `score` is populated on retrieval results and absent on writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier
    pub id: String,
    /// Textual content
    pub content: String,
    /// Embedding vector (if computed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Arbitrary metadata, filterable by field name
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Relevance score assigned by the backend (results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Document {
    /// Create a document with a generated id and no embedding.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content: content.into(),
            embedding: None,
            metadata: HashMap::new(),
            score: None,
        }
    }

    /// Attach an embedding vector.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach a metadata field.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
