//! Typed filter expressions.
//!
//! A filter is a recursive tree of two node shapes, disambiguated by key
//! set at parse time:
//!
//! - a *comparison*: `{"field": ..., "operator": ..., "value": ...}`
//! - a *logic clause*: `{"operator": "AND"|"OR"|"NOT", "conditions": [...]}`
//!
//! Anything else is rejected with a [`FilterError`]. The empty-filter case
//! (`{}`, `null`, or an absent filter) is handled one level up, in
//! [`normalize`](crate::normalize::normalize), and never reaches the parser.

use serde_json::Value;
use sift_core::FilterError;

/// Comparison operator for a single field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
}

impl ComparisonOperator {
    /// The caller-facing spelling of this operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "in",
            Self::NotIn => "not in",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            ">" => Some(Self::Gt),
            ">=" => Some(Self::Gte),
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Lte),
            "in" => Some(Self::In),
            "not in" => Some(Self::NotIn),
            _ => None,
        }
    }

    /// Whether this operator requires an orderable scalar (number or string).
    #[must_use]
    pub fn is_range(self) -> bool {
        matches!(self, Self::Gt | Self::Gte | Self::Lt | Self::Lte)
    }

    /// Whether this operator requires a list-typed value.
    #[must_use]
    pub fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

/// Logical combinator over child conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl LogicalOperator {
    /// The caller-facing spelling of this combinator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NOT" => Some(Self::Not),
            _ => None,
        }
    }
}

/// A parsed filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// A single field comparison.
    Comparison {
        field: String,
        operator: ComparisonOperator,
        value: Value,
    },
    /// A logical combination of child expressions. `conditions` is never
    /// empty; all combinators accept one or more operands, and `NOT` means
    /// "none of the conditions hold".
    Logic {
        operator: LogicalOperator,
        conditions: Vec<FilterExpr>,
    },
}

impl FilterExpr {
    /// Parse a raw JSON filter node into a typed expression.
    ///
    /// Recurses through logic clauses; validates operator spellings, field
    /// names, and operator/value type compatibility as it goes.
    pub fn parse(raw: &Value) -> Result<Self, FilterError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;

        if obj.contains_key("conditions") {
            Self::parse_logic(obj, raw)
        } else if obj.contains_key("field") {
            Self::parse_comparison(obj, raw)
        } else {
            Err(FilterError::MalformedNode(raw.to_string()))
        }
    }

    fn parse_logic(
        obj: &serde_json::Map<String, Value>,
        raw: &Value,
    ) -> Result<Self, FilterError> {
        let op_str = obj
            .get("operator")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;
        let operator = LogicalOperator::parse(op_str)
            .ok_or_else(|| FilterError::UnknownOperator(op_str.to_string()))?;

        let conditions = obj
            .get("conditions")
            .and_then(Value::as_array)
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;
        if conditions.is_empty() {
            return Err(FilterError::EmptyConditions {
                operator: operator.as_str().to_string(),
            });
        }

        let conditions = conditions
            .iter()
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::Logic {
            operator,
            conditions,
        })
    }

    fn parse_comparison(
        obj: &serde_json::Map<String, Value>,
        raw: &Value,
    ) -> Result<Self, FilterError> {
        let field = obj
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;
        if field.is_empty() {
            return Err(FilterError::EmptyField);
        }

        let op_str = obj
            .get("operator")
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;
        let operator = ComparisonOperator::parse(op_str)
            .ok_or_else(|| FilterError::UnknownOperator(op_str.to_string()))?;

        let value = obj
            .get("value")
            .ok_or_else(|| FilterError::MalformedNode(raw.to_string()))?;

        validate_value(field, operator, value)?;

        Ok(Self::Comparison {
            field: field.to_string(),
            operator,
            value: value.clone(),
        })
    }
}

/// Check operator/value type compatibility.
///
/// `in`/`not in` need an array; range operators need an orderable scalar
/// (number, or string for dates). Equality accepts anything, including
/// `null` ("field missing").
fn validate_value(
    field: &str,
    operator: ComparisonOperator,
    value: &Value,
) -> Result<(), FilterError> {
    let ok = if operator.is_membership() {
        value.is_array()
    } else if operator.is_range() {
        value.is_number() || value.is_string()
    } else {
        true
    };

    if ok {
        Ok(())
    } else {
        Err(FilterError::IncompatibleValue {
            operator: operator.as_str().to_string(),
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}
