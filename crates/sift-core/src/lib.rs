//! # sift-core
//!
//! Core types and traits for the sift retrieval layer.
//!
//! This crate provides the foundational abstractions used throughout sift:
//!
//! - **Documents**: [`Document`] records with content, embedding, and metadata
//! - **Errors**: [`FilterError`], [`QueryError`], [`StoreError`] and the
//!   umbrella [`Error`]
//! - **Transport seam**: the [`SearchBackend`] trait behind which all I/O
//!   lives
//!
//! ## Architecture
//!
//! ```text
//! filters → sift-filters (normalize) → native clause
//!                                         ↓
//! template + params → sift-query (compose) → request body → SearchBackend
//! ```
//!
//! ## Related Crates
//!
//! - `sift-filters`: filter-expression normalization
//! - `sift-query`: custom-query composition
//! - `sift-store`: document store and retrievers

pub mod error;
pub mod traits;
pub mod types;

pub use error::{Error, FilterError, QueryError, Result, StoreError};
pub use traits::SearchBackend;
pub use types::Document;
