//! Filter-expression normalization for sift.
//!
//! Converts a caller's structured filter (logical combinators over field
//! comparisons, carried as JSON) into the backend's native bool-query
//! clause.
//!
//! ```rust
//! use serde_json::json;
//! use sift_filters::normalize;
//!
//! // An empty or absent filter is legal and means "no filtering".
//! assert_eq!(normalize(None).unwrap(), None);
//! assert_eq!(normalize(Some(&json!({}))).unwrap(), None);
//!
//! // A comparison renders to the backend's native clause.
//! let clause = normalize(Some(&json!({
//!     "field": "genre", "operator": "==", "value": "rock"
//! }))).unwrap();
//! assert_eq!(clause, Some(json!({"term": {"genre": "rock"}})));
//! ```

pub mod expr;
pub mod normalize;

pub use expr::{ComparisonOperator, FilterExpr, LogicalOperator};
pub use normalize::normalize;
