//! Normalization of filter expressions into native backend clauses.
//!
//! The backend speaks OpenSearch-style bool queries. A parsed
//! [`FilterExpr`] renders into one of:
//!
//! | expression | native clause |
//! |---|---|
//! | `field == v` | `{"term": {field: v}}` |
//! | `field == null` | `{"bool": {"must_not": {"exists": {"field": field}}}}` |
//! | `field != v` | `{"bool": {"must_not": {"term": {field: v}}}}` |
//! | `field != null` | `{"exists": {"field": field}}` |
//! | `field > v` etc. | `{"range": {field: {"gt": v}}}` |
//! | `field in [..]` | `{"terms": {field: [..]}}` |
//! | `field not in [..]` | `{"bool": {"must_not": {"terms": {field: [..]}}}}` |
//! | `AND [..]` | `{"bool": {"must": [..]}}` |
//! | `OR [..]` | `{"bool": {"should": [..]}}` |
//! | `NOT [..]` | `{"bool": {"must_not": [..]}}` |
//!
//! Operand order is preserved through rendering, so normalization is
//! deterministic given its input.

use serde_json::{json, Value};
use sift_core::FilterError;

use crate::expr::{ComparisonOperator, FilterExpr, LogicalOperator};

/// Normalize a raw filter into the backend's native clause.
///
/// An absent filter (`None`), JSON `null`, or an empty mapping `{}` all mean
/// "no filtering" and return `Ok(None)` — the `NoFilter` sentinel. Anything
/// else must parse as a [`FilterExpr`] and renders to `Ok(Some(clause))`.
///
/// # Errors
///
/// Returns [`FilterError`] when the filter is present, non-empty, and does
/// not conform to the comparison / logic-clause shapes.
pub fn normalize(filters: Option<&Value>) -> Result<Option<Value>, FilterError> {
    let raw = match filters {
        None | Some(Value::Null) => return Ok(None),
        Some(v) => v,
    };
    if raw.as_object().is_some_and(serde_json::Map::is_empty) {
        return Ok(None);
    }

    let expr = FilterExpr::parse(raw)?;
    Ok(Some(expr.to_native()))
}

impl FilterExpr {
    /// Render this expression as the backend's native clause.
    ///
    /// Infallible: all validation happens in [`FilterExpr::parse`].
    #[must_use]
    pub fn to_native(&self) -> Value {
        match self {
            Self::Comparison {
                field,
                operator,
                value,
            } => comparison_to_native(field, *operator, value),
            Self::Logic {
                operator,
                conditions,
            } => {
                let clauses: Vec<Value> = conditions.iter().map(Self::to_native).collect();
                let key = match operator {
                    LogicalOperator::And => "must",
                    LogicalOperator::Or => "should",
                    LogicalOperator::Not => "must_not",
                };
                json!({"bool": {key: clauses}})
            }
        }
    }
}

fn comparison_to_native(field: &str, operator: ComparisonOperator, value: &Value) -> Value {
    match operator {
        ComparisonOperator::Eq => {
            if value.is_null() {
                json!({"bool": {"must_not": {"exists": {"field": field}}}})
            } else {
                json!({"term": {field: value}})
            }
        }
        ComparisonOperator::Ne => {
            if value.is_null() {
                json!({"exists": {"field": field}})
            } else {
                json!({"bool": {"must_not": {"term": {field: value}}}})
            }
        }
        ComparisonOperator::Gt => json!({"range": {field: {"gt": value}}}),
        ComparisonOperator::Gte => json!({"range": {field: {"gte": value}}}),
        ComparisonOperator::Lt => json!({"range": {field: {"lt": value}}}),
        ComparisonOperator::Lte => json!({"range": {field: {"lte": value}}}),
        ComparisonOperator::In => json!({"terms": {field: value}}),
        ComparisonOperator::NotIn => json!({"bool": {"must_not": {"terms": {field: value}}}}),
    }
}
