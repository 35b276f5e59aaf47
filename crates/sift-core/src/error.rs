//! Error types for sift.

use thiserror::Error;

/// Main error type for sift operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Filter normalization failed
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Query composition failed
    #[error("query error: {0}")]
    Query(#[from] QueryError),

    /// Backend operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Filter normalization errors.
///
/// Raised for malformed filter trees. An empty or absent top-level filter
/// is legal and never produces one of these.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("filter is neither a comparison nor a logic clause: {0}")]
    MalformedNode(String),

    #[error("unknown filter operator: {0}")]
    UnknownOperator(String),

    #[error("field name must not be empty")]
    EmptyField,

    #[error("logic clause '{operator}' requires at least one condition")]
    EmptyConditions { operator: String },

    #[error("operator '{operator}' on field '{field}' is incompatible with value {value}")]
    IncompatibleValue {
        operator: String,
        field: String,
        value: String,
    },
}

/// Query composition errors.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("custom query references {placeholder} but no value was supplied")]
    MissingParameter { placeholder: String },

    #[error("custom query must be a JSON object, got {0}")]
    InvalidTemplate(String),
}

/// Backend / transport errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Request(String),

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("backend returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("index not found: {0}")]
    IndexNotFound(String),
}

/// Result type alias for sift operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_error_malformed_display() {
        let err = FilterError::MalformedNode("{\"op\":\"==\"}".to_string());
        assert!(err.to_string().contains("neither a comparison"));
    }

    #[test]
    fn test_filter_error_unknown_operator_display() {
        let err = FilterError::UnknownOperator("~=".to_string());
        assert_eq!(err.to_string(), "unknown filter operator: ~=");
    }

    #[test]
    fn test_filter_error_empty_conditions_display() {
        let err = FilterError::EmptyConditions {
            operator: "AND".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "logic clause 'AND' requires at least one condition"
        );
    }

    #[test]
    fn test_filter_error_incompatible_value_display() {
        let err = FilterError::IncompatibleValue {
            operator: "in".to_string(),
            field: "genre".to_string(),
            value: "\"rock\"".to_string(),
        };
        assert!(err.to_string().contains("'in'"));
        assert!(err.to_string().contains("'genre'"));
    }

    #[test]
    fn test_query_error_missing_parameter_display() {
        let err = QueryError::MissingParameter {
            placeholder: "$query_embedding".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "custom query references $query_embedding but no value was supplied"
        );
    }

    #[test]
    fn test_store_error_request_display() {
        let err = StoreError::Request("connection refused".to_string());
        assert_eq!(err.to_string(), "backend request failed: connection refused");
    }

    #[test]
    fn test_store_error_dimension_mismatch_display() {
        let err = StoreError::DimensionMismatch {
            expected: 768,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "embedding dimension mismatch: expected 768, got 4"
        );
    }

    #[test]
    fn test_error_from_filter_error() {
        let filter_err = FilterError::EmptyField;
        let err: Error = filter_err.into();
        assert!(matches!(err, Error::Filter(_)));
        assert!(err.to_string().contains("filter error"));
    }

    #[test]
    fn test_error_from_query_error() {
        let query_err = QueryError::MissingParameter {
            placeholder: "$query".to_string(),
        };
        let err: Error = query_err.into();
        assert!(matches!(err, Error::Query(_)));
        assert!(err.to_string().contains("$query"));
    }

    #[test]
    fn test_error_from_store_error() {
        let store_err = StoreError::IndexNotFound("documents".to_string());
        let err: Error = store_err.into();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.to_string().contains("documents"));
    }

    #[test]
    fn test_result_type_alias() {
        fn ok_fn() -> Result<u32> {
            Ok(7)
        }

        fn err_fn() -> Result<u32> {
            Err(Error::Other("boom".to_string()))
        }

        assert!(ok_fn().is_ok());
        assert!(err_fn().is_err());
    }
}
