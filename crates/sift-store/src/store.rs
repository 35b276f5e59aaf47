//! Document store: the caller-facing entry point for retrieval.
//!
//! [`DocumentStore`] wires the pure core (filter normalization, query
//! composition) to a pluggable [`SearchBackend`] transport. Each retrieval
//! call normalizes its filters, composes one complete request body, and
//! hands it to the backend.

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use sift_core::{Document, Error, SearchBackend, StoreError};
use sift_filters::normalize;
use sift_query::{compose, QueryParams};

use crate::config::StoreConfig;

/// A document store bound to one backend index.
pub struct DocumentStore {
    backend: Arc<dyn SearchBackend>,
    config: StoreConfig,
}

impl DocumentStore {
    /// Create a store over the given backend.
    #[must_use]
    pub fn new(backend: Arc<dyn SearchBackend>, config: StoreConfig) -> Self {
        Self { backend, config }
    }

    /// The index this store is bound to.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// The store configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Index (upsert) documents.
    pub async fn write_documents(&self, docs: &[Document]) -> Result<u64, Error> {
        let written = self
            .backend
            .write_documents(&self.config.index, docs)
            .await?;
        debug!(index = %self.config.index, written, "wrote documents");
        Ok(written)
    }

    /// Number of documents in the index.
    pub async fn count_documents(&self) -> Result<u64, Error> {
        Ok(self.backend.count_documents(&self.config.index).await?)
    }

    /// Embedding-based retrieval.
    ///
    /// The query embedding must match the configured `embedding_dim`.
    /// Normalizes `filters` (empty/absent filters are legal and mean "no
    /// filtering"), composes the request body — through `custom_query` when
    /// given — and executes it against the backend.
    pub async fn embedding_retrieval(
        &self,
        query_embedding: &[f32],
        filters: Option<&Value>,
        top_k: Option<usize>,
        custom_query: Option<&Value>,
    ) -> Result<Vec<Document>, Error> {
        if query_embedding.len() != self.config.embedding_dim {
            return Err(StoreError::DimensionMismatch {
                expected: self.config.embedding_dim,
                actual: query_embedding.len(),
            }
            .into());
        }

        let top_k = top_k.unwrap_or(self.config.top_k);
        let filter_clause = normalize(filters)?;

        let params = QueryParams::new(top_k).with_vector(query_embedding);
        let body = compose(custom_query, filter_clause.as_ref(), &params)?;

        debug!(
            index = %self.config.index,
            top_k,
            filtered = filter_clause.is_some(),
            "embedding retrieval"
        );
        Ok(self.backend.search(&self.config.index, &body).await?)
    }

    /// BM25 full-text retrieval.
    pub async fn bm25_retrieval(
        &self,
        query: &str,
        filters: Option<&Value>,
        top_k: Option<usize>,
        custom_query: Option<&Value>,
        all_terms_must_match: bool,
    ) -> Result<Vec<Document>, Error> {
        let top_k = top_k.unwrap_or(self.config.top_k);
        let filter_clause = normalize(filters)?;

        let params = QueryParams::new(top_k)
            .with_query_text(query)
            .with_fuzziness(&self.config.fuzziness)
            .with_all_terms_must_match(all_terms_must_match);
        let body = compose(custom_query, filter_clause.as_ref(), &params)?;

        debug!(
            index = %self.config.index,
            top_k,
            filtered = filter_clause.is_some(),
            "bm25 retrieval"
        );
        Ok(self.backend.search(&self.config.index, &body).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use sift_core::StoreError;
    use tokio::sync::RwLock;

    /// Backend that records the last body it was asked to execute.
    struct RecordingBackend {
        last_body: RwLock<Option<Value>>,
        results: Vec<Document>,
    }

    impl RecordingBackend {
        fn new(results: Vec<Document>) -> Self {
            Self {
                last_body: RwLock::new(None),
                results,
            }
        }
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        async fn search(&self, _index: &str, body: &Value) -> Result<Vec<Document>, StoreError> {
            *self.last_body.write().await = Some(body.clone());
            Ok(self.results.clone())
        }

        async fn write_documents(
            &self,
            _index: &str,
            docs: &[Document],
        ) -> Result<u64, StoreError> {
            Ok(docs.len() as u64)
        }

        async fn count_documents(&self, _index: &str) -> Result<u64, StoreError> {
            Ok(self.results.len() as u64)
        }
    }

    fn store_with(backend: Arc<RecordingBackend>) -> DocumentStore {
        DocumentStore::new(
            backend,
            StoreConfig::for_index("test").with_embedding_dim(2),
        )
    }

    #[tokio::test]
    async fn test_embedding_retrieval_builds_default_body() {
        let backend = Arc::new(RecordingBackend::new(vec![Document::new("hit")]));
        let store = store_with(Arc::clone(&backend));

        let results = store
            .embedding_retrieval(&[0.5, 0.25], None, Some(3), None)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);

        let body = backend.last_body.read().await.clone().unwrap();
        assert_eq!(body["size"], 3);
        assert_eq!(
            body["query"]["bool"]["must"][0]["knn"]["embedding"]["k"],
            3
        );
    }

    #[tokio::test]
    async fn test_embedding_retrieval_rejects_wrong_dimension() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(backend);

        let err = store
            .embedding_retrieval(&[0.5, 0.25, 0.125], None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Store(StoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_bm25_retrieval_builds_default_body() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(Arc::clone(&backend));

        store
            .bm25_retrieval("hello world", None, None, None, true)
            .await
            .unwrap();

        let body = backend.last_body.read().await.clone().unwrap();
        let clause = &body["query"]["bool"]["must"][0]["multi_match"];
        assert_eq!(clause["query"], "hello world");
        assert_eq!(clause["operator"], "and");
        assert_eq!(clause["fuzziness"], "AUTO");
        assert_eq!(body["size"], 10);
    }

    #[tokio::test]
    async fn test_retrieval_with_filters_includes_clause() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(Arc::clone(&backend));

        let filters = json!({"field": "genre", "operator": "==", "value": "rock"});
        store
            .bm25_retrieval("hello", Some(&filters), None, None, false)
            .await
            .unwrap();

        let body = backend.last_body.read().await.clone().unwrap();
        assert_eq!(
            body["query"]["bool"]["filter"],
            json!({"term": {"genre": "rock"}})
        );
    }

    #[tokio::test]
    async fn test_retrieval_with_empty_filters_has_no_filter_key() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(Arc::clone(&backend));

        let filters = json!({});
        store
            .bm25_retrieval("hello", Some(&filters), None, None, false)
            .await
            .unwrap();

        let body = backend.last_body.read().await.clone().unwrap();
        assert!(body["query"]["bool"].get("filter").is_none());
    }

    #[tokio::test]
    async fn test_retrieval_propagates_filter_error() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(backend);

        let filters = json!({"operator": "AND", "conditions": []});
        let err = store
            .bm25_retrieval("hello", Some(&filters), None, None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Filter(_)));
    }

    #[tokio::test]
    async fn test_retrieval_propagates_composition_error() {
        let backend = Arc::new(RecordingBackend::new(vec![]));
        let store = store_with(backend);

        let custom_query = json!({"query": {
            "knn": {"embedding": {"vector": "$query_embedding"}}
        }});
        // BM25 retrieval supplies no vector, so the placeholder is unmet.
        let err = store
            .bm25_retrieval("hello", None, None, Some(&custom_query), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }

    #[tokio::test]
    async fn test_write_and_count() {
        let backend = Arc::new(RecordingBackend::new(vec![Document::new("a")]));
        let store = store_with(backend);

        let written = store
            .write_documents(&[Document::new("a"), Document::new("b")])
            .await
            .unwrap();
        assert_eq!(written, 2);
        assert_eq!(store.count_documents().await.unwrap(), 1);
    }
}
