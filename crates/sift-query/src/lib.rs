//! Custom-query composition for sift.
//!
//! Produces the final backend request body from an optional caller-supplied
//! custom-query template, the normalized filter clause, and per-call
//! parameters (query vector, query text, result limit).
//!
//! ```rust
//! use serde_json::json;
//! use sift_query::{compose, QueryParams};
//!
//! let template = json!({
//!     "query": {"bool": {
//!         "must": [{"match": {"content": "$query"}}],
//!         "filter": "$filters"
//!     }}
//! });
//!
//! // No filter: the filter key is omitted, never left empty.
//! let params = QueryParams::new(10).with_query_text("hello");
//! let body = compose(Some(&template), None, &params).unwrap();
//! assert!(body["query"]["bool"].get("filter").is_none());
//! ```

pub mod composer;
pub mod template;

pub use composer::{compose, QueryParams};
pub use template::{FILTERS, QUERY, QUERY_EMBEDDING};
