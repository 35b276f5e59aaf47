//! Placeholder substitution over custom-query templates.
//!
//! A template is an opaque backend-native query document whose string leaves
//! may be placeholder tokens:
//!
//! - [`FILTERS`] — replaced by the normalized filter clause, or, when no
//!   filter was supplied, *removed together with its containing key* (an
//!   empty clause where the backend expects a populated one is a backend
//!   error; omission is the only accepted form of "unfiltered")
//! - [`QUERY_EMBEDDING`] — replaced by the query vector
//! - [`QUERY`] — replaced by the free-text query string
//!
//! Unrecognized `$`-tokens are left verbatim for forward compatibility.
//! Rendering produces a new document; the template is never mutated.

use serde_json::{Map, Value};
use sift_core::QueryError;

/// Placeholder for the normalized filter clause.
pub const FILTERS: &str = "$filters";
/// Placeholder for the query embedding vector.
pub const QUERY_EMBEDDING: &str = "$query_embedding";
/// Placeholder for the free-text query string.
pub const QUERY: &str = "$query";

/// Values available for substitution during one render.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Substitutions<'a> {
    pub filter: Option<&'a Value>,
    pub vector: Option<&'a [f32]>,
    pub query_text: Option<&'a str>,
}

/// How a single string leaf resolves.
enum Resolution {
    /// Replace the leaf with this value.
    Replace(Value),
    /// Drop the leaf and its containing key / array slot.
    Omit,
    /// Not a recognized placeholder; copy verbatim.
    Keep,
}

/// Render a template, resolving every recognized placeholder.
pub(crate) fn render(template: &Value, subs: &Substitutions<'_>) -> Result<Value, QueryError> {
    match template {
        Value::Object(obj) => {
            let mut out = Map::with_capacity(obj.len());
            for (key, child) in obj {
                // A child resolving to "omit" takes its key with it.
                if let Some(rendered) = render_child(child, subs)? {
                    out.insert(key.clone(), rendered);
                }
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                if let Some(rendered) = render_child(item, subs)? {
                    out.push(rendered);
                }
            }
            Ok(Value::Array(out))
        }
        Value::String(s) => match resolve(s, subs)? {
            Resolution::Replace(value) => Ok(value),
            // A bare top-level placeholder has no containing key to remove;
            // omission degrades to null.
            Resolution::Omit => Ok(Value::Null),
            Resolution::Keep => Ok(template.clone()),
        },
        _ => Ok(template.clone()),
    }
}

/// Render a child node, returning `None` when it must be dropped from its
/// enclosing structure.
fn render_child(child: &Value, subs: &Substitutions<'_>) -> Result<Option<Value>, QueryError> {
    if let Value::String(s) = child {
        return match resolve(s, subs)? {
            Resolution::Replace(value) => Ok(Some(value)),
            Resolution::Omit => Ok(None),
            Resolution::Keep => Ok(Some(child.clone())),
        };
    }
    render(child, subs).map(Some)
}

fn resolve(leaf: &str, subs: &Substitutions<'_>) -> Result<Resolution, QueryError> {
    match leaf {
        FILTERS => Ok(match subs.filter {
            Some(clause) => Resolution::Replace(clause.clone()),
            None => Resolution::Omit,
        }),
        QUERY_EMBEDDING => {
            let vector = subs.vector.ok_or_else(|| QueryError::MissingParameter {
                placeholder: QUERY_EMBEDDING.to_string(),
            })?;
            let values = vector.iter().map(|&f| Value::from(f64::from(f))).collect();
            Ok(Resolution::Replace(Value::Array(values)))
        }
        QUERY => {
            let text = subs.query_text.ok_or_else(|| QueryError::MissingParameter {
                placeholder: QUERY.to_string(),
            })?;
            Ok(Resolution::Replace(Value::String(text.to_string())))
        }
        _ => Ok(Resolution::Keep),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_substitutes_filter_in_place() {
        let template = json!({"query": {"bool": {"filter": "$filters"}}});
        let clause = json!({"term": {"genre": "rock"}});
        let subs = Substitutions {
            filter: Some(&clause),
            ..Default::default()
        };

        let rendered = render(&template, &subs).unwrap();
        assert_eq!(
            rendered,
            json!({"query": {"bool": {"filter": {"term": {"genre": "rock"}}}}})
        );
    }

    #[test]
    fn test_render_removes_filter_key_when_no_filter() {
        let template = json!({"query": {"bool": {
            "must": [{"match": {"content": "$query"}}],
            "filter": "$filters"
        }}});
        let subs = Substitutions {
            query_text: Some("hello"),
            ..Default::default()
        };

        let rendered = render(&template, &subs).unwrap();
        assert_eq!(
            rendered,
            json!({"query": {"bool": {
                "must": [{"match": {"content": "hello"}}]
            }}})
        );
    }

    #[test]
    fn test_render_drops_filter_array_slot_when_no_filter() {
        let template = json!({"query": {"bool": {"must": ["$filters", {"match_all": {}}]}}});
        let subs = Substitutions::default();

        let rendered = render(&template, &subs).unwrap();
        assert_eq!(
            rendered,
            json!({"query": {"bool": {"must": [{"match_all": {}}]}}})
        );
    }

    #[test]
    fn test_render_substitutes_vector() {
        let template = json!({"knn": {"embedding": {"vector": "$query_embedding", "k": 10}}});
        let vector = [0.5_f32, 0.25];
        let subs = Substitutions {
            vector: Some(&vector),
            ..Default::default()
        };

        let rendered = render(&template, &subs).unwrap();
        assert_eq!(
            rendered,
            json!({"knn": {"embedding": {"vector": [0.5, 0.25], "k": 10}}})
        );
    }

    #[test]
    fn test_render_missing_vector_fails() {
        let template = json!({"knn": {"embedding": {"vector": "$query_embedding"}}});
        let err = render(&template, &Substitutions::default()).unwrap_err();
        assert!(matches!(err, QueryError::MissingParameter { .. }));
        assert!(err.to_string().contains("$query_embedding"));
    }

    #[test]
    fn test_render_missing_query_text_fails() {
        let template = json!({"multi_match": {"query": "$query"}});
        let err = render(&template, &Substitutions::default()).unwrap_err();
        assert!(matches!(err, QueryError::MissingParameter { .. }));
        assert!(err.to_string().contains("$query"));
    }

    #[test]
    fn test_render_leaves_unknown_tokens_verbatim() {
        let template = json!({"script": {"source": "$custom_token"}});
        let rendered = render(&template, &Substitutions::default()).unwrap();
        assert_eq!(rendered, template);
    }

    #[test]
    fn test_render_resolves_multiple_occurrences_independently() {
        let template = json!({
            "a": "$filters",
            "b": {"nested": "$filters"}
        });
        let clause = json!({"term": {"x": 1}});
        let subs = Substitutions {
            filter: Some(&clause),
            ..Default::default()
        };

        let rendered = render(&template, &subs).unwrap();
        assert_eq!(rendered["a"], clause);
        assert_eq!(rendered["b"]["nested"], clause);
    }

    #[test]
    fn test_render_never_mutates_template() {
        let template = json!({"query": {"bool": {"filter": "$filters"}}});
        let snapshot = template.clone();
        let clause = json!({"term": {"x": 1}});
        let subs = Substitutions {
            filter: Some(&clause),
            ..Default::default()
        };

        let _ = render(&template, &subs).unwrap();
        assert_eq!(template, snapshot);
    }

    #[test]
    fn test_render_copies_non_placeholder_scalars() {
        let template = json!({"size": 5, "track_scores": true, "note": null});
        let rendered = render(&template, &Substitutions::default()).unwrap();
        assert_eq!(rendered, template);
    }
}
