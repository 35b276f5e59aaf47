//! In-memory backend for testing without a search cluster.
//!
//! [`MemoryBackend`] interprets the subset of composed request bodies the
//! store layer produces: `match_all`, `bool` queries with `knn` /
//! `multi_match` / `match` must-clauses, `term` / `terms` / `range` /
//! `exists` / nested `bool` filter clauses, and `size`. Vector scoring is
//! brute-force cosine similarity; text scoring is term overlap. Not meant
//! for production use.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use sift_core::{Document, SearchBackend, StoreError};

/// In-memory search backend for tests.
#[derive(Default)]
pub struct MemoryBackend {
    indices: Arc<RwLock<HashMap<String, HashMap<String, Document>>>>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of query terms present in the content, case-insensitive.
    fn term_overlap(query: &str, content: &str) -> f32 {
        let content = content.to_lowercase();
        let terms: Vec<String> = query
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if terms.is_empty() {
            return 0.0;
        }
        let hits = terms.iter().filter(|t| content.contains(t.as_str())).count();
        hits as f32 / terms.len() as f32
    }

    /// Score a document against one must-clause; `None` excludes the doc.
    fn score_clause(clause: &Value, doc: &Document) -> Result<Option<f32>, StoreError> {
        let obj = clause
            .as_object()
            .ok_or_else(|| StoreError::Request(format!("unsupported clause: {clause}")))?;

        if obj.contains_key("match_all") {
            return Ok(Some(1.0));
        }

        if let Some(knn) = obj.get("knn") {
            let vector = knn
                .get("embedding")
                .and_then(|e| e.get("vector"))
                .and_then(Value::as_array)
                .ok_or_else(|| StoreError::Request("knn clause missing vector".to_string()))?;
            let query_vec: Vec<f32> = vector
                .iter()
                .filter_map(Value::as_f64)
                .map(|f| f as f32)
                .collect();
            return Ok(doc
                .embedding
                .as_ref()
                .map(|emb| cosine_similarity(&query_vec, emb)));
        }

        if let Some(mm) = obj.get("multi_match") {
            let query = mm
                .get("query")
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::Request("multi_match missing query".to_string()))?;
            let score = Self::term_overlap(query, &doc.content);
            return Ok((score > 0.0).then_some(score));
        }

        if let Some(m) = obj.get("match") {
            // {"match": {field: text}}; only content matching is supported.
            let query = m
                .as_object()
                .and_then(|fields| fields.values().next())
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::Request("match missing query text".to_string()))?;
            let score = Self::term_overlap(query, &doc.content);
            return Ok((score > 0.0).then_some(score));
        }

        Err(StoreError::Request(format!("unsupported clause: {clause}")))
    }

    /// Evaluate a native filter clause against document metadata.
    fn matches_filter(clause: &Value, doc: &Document) -> Result<bool, StoreError> {
        let obj = clause
            .as_object()
            .ok_or_else(|| StoreError::Request(format!("unsupported filter: {clause}")))?;

        if let Some(term) = obj.get("term").and_then(Value::as_object) {
            return Ok(term
                .iter()
                .all(|(field, value)| doc.metadata.get(field) == Some(value)));
        }

        if let Some(terms) = obj.get("terms").and_then(Value::as_object) {
            return Ok(terms.iter().all(|(field, values)| {
                values.as_array().is_some_and(|vs| {
                    doc.metadata
                        .get(field)
                        .is_some_and(|actual| vs.contains(actual))
                })
            }));
        }

        if let Some(range) = obj.get("range").and_then(Value::as_object) {
            for (field, bounds) in range {
                let Some(actual) = doc.metadata.get(field) else {
                    return Ok(false);
                };
                let bounds = bounds
                    .as_object()
                    .ok_or_else(|| StoreError::Request("range bounds must be an object".to_string()))?;
                for (op, bound) in bounds {
                    let Some(ord) = compare_values(actual, bound) else {
                        return Ok(false);
                    };
                    let ok = match op.as_str() {
                        "gt" => ord == Ordering::Greater,
                        "gte" => ord != Ordering::Less,
                        "lt" => ord == Ordering::Less,
                        "lte" => ord != Ordering::Greater,
                        other => {
                            return Err(StoreError::Request(format!(
                                "unsupported range bound: {other}"
                            )))
                        }
                    };
                    if !ok {
                        return Ok(false);
                    }
                }
            }
            return Ok(true);
        }

        if let Some(exists) = obj.get("exists") {
            let field = exists
                .get("field")
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::Request("exists missing field".to_string()))?;
            return Ok(doc.metadata.contains_key(field));
        }

        if let Some(boolean) = obj.get("bool").and_then(Value::as_object) {
            for clause in clause_list(boolean.get("must")) {
                if !Self::matches_filter(clause, doc)? {
                    return Ok(false);
                }
            }
            let should = clause_list(boolean.get("should"));
            if !should.is_empty() && !should
                .iter()
                .map(|c| Self::matches_filter(c, doc))
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .any(|m| m)
            {
                return Ok(false);
            }
            for clause in clause_list(boolean.get("must_not")) {
                if Self::matches_filter(clause, doc)? {
                    return Ok(false);
                }
            }
            for clause in clause_list(boolean.get("filter")) {
                if !Self::matches_filter(clause, doc)? {
                    return Ok(false);
                }
            }
            return Ok(true);
        }

        Err(StoreError::Request(format!("unsupported filter: {clause}")))
    }
}

/// Cosine similarity in one pass over both vectors. Mismatched lengths and
/// zero-norm vectors score 0.0.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f32, 0.0_f32, 0.0_f32);
    for (x, y) in a.iter().zip(b) {
        dot = x.mul_add(*y, dot);
        norm_a = x.mul_add(*x, norm_a);
        norm_b = y.mul_add(*y, norm_b);
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// A bool-clause slot holds either one clause or an array of clauses.
fn clause_list(slot: Option<&Value>) -> Vec<&Value> {
    match slot {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

#[async_trait]
impl SearchBackend for MemoryBackend {
    async fn search(&self, index: &str, body: &Value) -> Result<Vec<Document>, StoreError> {
        let indices = self.indices.read().await;
        let docs = indices
            .get(index)
            .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;

        let size = body
            .get("size")
            .and_then(Value::as_u64)
            .unwrap_or(10) as usize;
        let query = body
            .get("query")
            .ok_or_else(|| StoreError::Request("body missing query".to_string()))?;

        let (must, filter) = if query.get("match_all").is_some() {
            (Vec::new(), None)
        } else if let Some(boolean) = query.get("bool") {
            (clause_list(boolean.get("must")), boolean.get("filter"))
        } else {
            return Err(StoreError::Request(format!("unsupported query: {query}")));
        };

        let mut scored: Vec<Document> = Vec::new();
        'docs: for doc in docs.values() {
            if let Some(filter) = filter {
                for clause in clause_list(Some(filter)) {
                    if !Self::matches_filter(clause, doc)? {
                        continue 'docs;
                    }
                }
            }

            let mut score = 1.0_f32;
            for clause in &must {
                match Self::score_clause(clause, doc)? {
                    Some(s) => score = score.min(s),
                    None => continue 'docs,
                }
            }

            let mut hit = doc.clone();
            hit.score = Some(f64::from(score));
            scored.push(hit);
        }

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
        });
        scored.truncate(size);

        debug!(index, hits = scored.len(), "memory search");
        Ok(scored)
    }

    async fn write_documents(&self, index: &str, docs: &[Document]) -> Result<u64, StoreError> {
        let mut indices = self.indices.write().await;
        let store = indices.entry(index.to_string()).or_default();
        for doc in docs {
            store.insert(doc.id.clone(), doc.clone());
        }
        debug!(index, written = docs.len(), "wrote documents");
        Ok(docs.len() as u64)
    }

    async fn count_documents(&self, index: &str) -> Result<u64, StoreError> {
        let indices = self.indices.read().await;
        Ok(indices.get(index).map_or(0, |docs| docs.len() as u64))
    }
}
