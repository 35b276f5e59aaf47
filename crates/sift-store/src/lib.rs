//! Document store and retrievers for sift.
//!
//! This crate wires the pure core (filter normalization in `sift-filters`,
//! query composition in `sift-query`) to a pluggable
//! [`SearchBackend`](sift_core::SearchBackend) transport.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sift_store::{DocumentStore, EmbeddingRetriever, MemoryBackend, StoreConfig};
//!
//! let backend = Arc::new(MemoryBackend::new());
//! let store = Arc::new(DocumentStore::new(backend, StoreConfig::for_index("docs")));
//! let retriever = EmbeddingRetriever::new(store).with_top_k(5);
//!
//! let results = retriever.run(&query_embedding, None, None, None).await?;
//! ```

pub mod config;
pub mod memory;
pub mod retriever;
pub mod store;

pub use config::StoreConfig;
pub use memory::MemoryBackend;
pub use retriever::{Bm25Retriever, EmbeddingRetriever};
pub use store::DocumentStore;
