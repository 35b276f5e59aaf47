//! Request-body composition.
//!
//! [`compose`] merges an optional custom-query template with the normalized
//! filter clause and per-call parameters into the final request body. With
//! no template, a backend-default body is built: a k-NN clause when a query
//! vector is present, a `multi_match` clause when query text is present,
//! `match_all` otherwise.

use serde_json::{json, Map, Value};
use sift_core::QueryError;
use tracing::debug;

use crate::template::{self, Substitutions};

/// Per-call parameters for query composition.
#[derive(Debug, Clone, Copy)]
pub struct QueryParams<'a> {
    /// Query embedding for k-NN retrieval
    pub vector: Option<&'a [f32]>,
    /// Free-text query for BM25 retrieval
    pub query_text: Option<&'a str>,
    /// Result-count limit
    pub top_k: usize,
    /// Fuzziness for full-text matching
    pub fuzziness: &'a str,
    /// Require every term to match (`operator: and`) instead of any
    pub all_terms_must_match: bool,
}

impl<'a> QueryParams<'a> {
    /// Parameters with only a result limit set.
    #[must_use]
    pub fn new(top_k: usize) -> Self {
        Self {
            vector: None,
            query_text: None,
            top_k,
            fuzziness: "AUTO",
            all_terms_must_match: false,
        }
    }

    /// Set the query embedding.
    #[must_use]
    pub fn with_vector(mut self, vector: &'a [f32]) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Set the free-text query.
    #[must_use]
    pub fn with_query_text(mut self, text: &'a str) -> Self {
        self.query_text = Some(text);
        self
    }

    /// Set the fuzziness used by the default full-text clause.
    #[must_use]
    pub fn with_fuzziness(mut self, fuzziness: &'a str) -> Self {
        self.fuzziness = fuzziness;
        self
    }

    /// Require all query terms to match.
    #[must_use]
    pub fn with_all_terms_must_match(mut self, required: bool) -> Self {
        self.all_terms_must_match = required;
        self
    }
}

/// Compose the final request body.
///
/// `filter` is the output of [`sift_filters::normalize`]: `Some` holds the
/// native clause, `None` means "no filtering". With a template, every
/// recognized placeholder is resolved (see [`crate::template`]); without
/// one, the backend-default body is built from `params`. Either way the
/// body's `size` is set to `top_k` and the inputs are left untouched.
///
/// # Errors
///
/// Returns [`QueryError::MissingParameter`] when the template references a
/// vector or query-text placeholder the caller did not supply, and
/// [`QueryError::InvalidTemplate`] when the template is not a JSON object.
pub fn compose(
    template: Option<&Value>,
    filter: Option<&Value>,
    params: &QueryParams<'_>,
) -> Result<Value, QueryError> {
    let mut body = match template {
        Some(custom) => render_template(custom, filter, params)?,
        None => default_body(filter, params),
    };

    if let Some(obj) = body.as_object_mut() {
        obj.insert("size".to_string(), json!(params.top_k));
    }

    debug!(top_k = params.top_k, templated = template.is_some(), "composed request body");
    Ok(body)
}

fn render_template(
    custom: &Value,
    filter: Option<&Value>,
    params: &QueryParams<'_>,
) -> Result<Value, QueryError> {
    if !custom.is_object() {
        return Err(QueryError::InvalidTemplate(custom.to_string()));
    }
    let subs = Substitutions {
        filter,
        vector: params.vector,
        query_text: params.query_text,
    };
    template::render(custom, &subs)
}

fn default_body(filter: Option<&Value>, params: &QueryParams<'_>) -> Value {
    let must = if let Some(vector) = params.vector {
        let values: Vec<Value> = vector.iter().map(|&f| Value::from(f64::from(f))).collect();
        Some(json!({"knn": {"embedding": {
            "vector": values,
            "k": params.top_k
        }}}))
    } else {
        params.query_text.map(|text| {
            json!({"multi_match": {
                "query": text,
                "fuzziness": params.fuzziness,
                "type": "most_fields",
                "operator": if params.all_terms_must_match { "and" } else { "or" }
            }})
        })
    };

    match (must, filter) {
        (Some(clause), Some(filter_clause)) => json!({"query": {"bool": {
            "must": [clause],
            "filter": filter_clause
        }}}),
        (Some(clause), None) => json!({"query": {"bool": {"must": [clause]}}}),
        (None, Some(filter_clause)) => json!({"query": {"bool": {
            "must": [{"match_all": {}}],
            "filter": filter_clause
        }}}),
        (None, None) => {
            let mut body = Map::new();
            body.insert("query".to_string(), json!({"match_all": {}}));
            Value::Object(body)
        }
    }
}
