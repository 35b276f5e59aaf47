//! Retrievers: thin wrappers over a [`DocumentStore`].
//!
//! A retriever holds per-instance defaults (filters, result limit, custom
//! query) set at construction; every `run` argument can override its
//! default for that call, falling back otherwise.

use serde_json::Value;
use std::sync::Arc;

use sift_core::{Document, Error};

use crate::store::DocumentStore;

const DEFAULT_TOP_K: usize = 10;

/// Embedding-based retriever.
pub struct EmbeddingRetriever {
    store: Arc<DocumentStore>,
    filters: Option<Value>,
    top_k: usize,
    custom_query: Option<Value>,
}

impl EmbeddingRetriever {
    /// Create a retriever with default settings.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            filters: None,
            top_k: DEFAULT_TOP_K,
            custom_query: None,
        }
    }

    /// Set default filters applied when a call supplies none.
    #[must_use]
    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Set the default result limit.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set a default custom-query template.
    #[must_use]
    pub fn with_custom_query(mut self, custom_query: Value) -> Self {
        self.custom_query = Some(custom_query);
        self
    }

    /// Retrieve documents for a query embedding.
    ///
    /// `filters`, `top_k`, and `custom_query` override the instance
    /// defaults for this call when given.
    pub async fn run(
        &self,
        query_embedding: &[f32],
        filters: Option<&Value>,
        top_k: Option<usize>,
        custom_query: Option<&Value>,
    ) -> Result<Vec<Document>, Error> {
        self.store
            .embedding_retrieval(
                query_embedding,
                filters.or(self.filters.as_ref()),
                Some(top_k.unwrap_or(self.top_k)),
                custom_query.or(self.custom_query.as_ref()),
            )
            .await
    }
}

/// BM25 full-text retriever.
pub struct Bm25Retriever {
    store: Arc<DocumentStore>,
    filters: Option<Value>,
    top_k: usize,
    custom_query: Option<Value>,
    all_terms_must_match: bool,
}

impl Bm25Retriever {
    /// Create a retriever with default settings.
    #[must_use]
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self {
            store,
            filters: None,
            top_k: DEFAULT_TOP_K,
            custom_query: None,
            all_terms_must_match: false,
        }
    }

    /// Set default filters applied when a call supplies none.
    #[must_use]
    pub fn with_filters(mut self, filters: Value) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Set the default result limit.
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set a default custom-query template.
    #[must_use]
    pub fn with_custom_query(mut self, custom_query: Value) -> Self {
        self.custom_query = Some(custom_query);
        self
    }

    /// Require every query term to match.
    #[must_use]
    pub fn with_all_terms_must_match(mut self, required: bool) -> Self {
        self.all_terms_must_match = required;
        self
    }

    /// Retrieve documents for a free-text query.
    pub async fn run(
        &self,
        query: &str,
        filters: Option<&Value>,
        top_k: Option<usize>,
        custom_query: Option<&Value>,
    ) -> Result<Vec<Document>, Error> {
        self.store
            .bm25_retrieval(
                query,
                filters.or(self.filters.as_ref()),
                Some(top_k.unwrap_or(self.top_k)),
                custom_query.or(self.custom_query.as_ref()),
                self.all_terms_must_match,
            )
            .await
    }
}
