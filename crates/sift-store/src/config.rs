//! Store configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`DocumentStore`](crate::DocumentStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Index to search against
    #[serde(default = "default_index")]
    pub index: String,

    /// Embedding dimension of stored documents
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Fuzziness for full-text matching
    #[serde(default = "default_fuzziness")]
    pub fuzziness: String,

    /// Result limit used when a call does not specify one
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_index() -> String {
    "default".to_string()
}

fn default_embedding_dim() -> usize {
    768
}

fn default_fuzziness() -> String {
    "AUTO".to_string()
}

fn default_top_k() -> usize {
    10
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            embedding_dim: default_embedding_dim(),
            fuzziness: default_fuzziness(),
            top_k: default_top_k(),
        }
    }
}

impl StoreConfig {
    /// Config for the named index, defaults elsewhere.
    #[must_use]
    pub fn for_index(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    /// Set the embedding dimension of stored documents.
    #[must_use]
    pub fn with_embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }
}
