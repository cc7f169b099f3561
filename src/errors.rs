//! Error types for aeroquery
//!
//! Three families, each with its own handling:
//! - Type validation: an operand's runtime type is outside what the operator accepts
//! - Configuration: a query or config value is malformed (bad operator, bad combineWith)
//! - Store: raised by the document store and passed through unmodified
//!
//! None of them are retried.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error family, used for routing and for log fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Operand type outside the operator's allowed set
    TypeValidation,
    /// Malformed query or configuration
    Configuration,
    /// Raised by the external document store
    Store,
}

/// Query errors
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    // ==================
    // Type validation
    // ==================
    /// Operand type not in the allowed set for the operator
    #[error("operator '{op}': value must be one of {expected}, got {actual}")]
    TypeValidation {
        op: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Ordering between two allowed but different kinds (e.g. string < number)
    #[error("operator '{op}': cannot order {left} against {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Range operand is not a [low, high] pair
    #[error("operator '{op}': range must have exactly 2 elements, got {len}")]
    RangeArity { op: &'static str, len: usize },

    /// Record has no value for the clause field
    #[error("operator '{op}': field '{field}' is missing from the record")]
    MissingField { op: &'static str, field: String },

    // ==================
    // Configuration
    // ==================
    /// combineWith present but neither "and" nor "or"
    #[error("combineWith value must be \"and\" or \"or\", got \"{0}\"")]
    InvalidCombineWith(String),

    /// Operator string outside the closed set
    #[error("unknown operator: {0}")]
    InvalidOperator(String),

    /// Query document could not be read
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Runner configuration rejected
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    // ==================
    // Store
    // ==================
    /// Error surfaced by the document store
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    /// Returns the error family
    pub fn kind(&self) -> ErrorKind {
        match self {
            QueryError::TypeValidation { .. }
            | QueryError::TypeMismatch { .. }
            | QueryError::RangeArity { .. }
            | QueryError::MissingField { .. } => ErrorKind::TypeValidation,
            QueryError::InvalidCombineWith(_)
            | QueryError::InvalidOperator(_)
            | QueryError::InvalidQuery(_)
            | QueryError::InvalidConfig(_) => ErrorKind::Configuration,
            QueryError::Store(_) => ErrorKind::Store,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::TypeValidation { .. } => "AERO_QUERY_TYPE_INVALID",
            QueryError::TypeMismatch { .. } => "AERO_QUERY_TYPE_MISMATCH",
            QueryError::RangeArity { .. } => "AERO_QUERY_RANGE_ARITY",
            QueryError::MissingField { .. } => "AERO_QUERY_FIELD_MISSING",
            QueryError::InvalidCombineWith(_) => "AERO_QUERY_COMBINE_WITH",
            QueryError::InvalidOperator(_) => "AERO_QUERY_OPERATOR",
            QueryError::InvalidQuery(_) => "AERO_QUERY_INVALID",
            QueryError::InvalidConfig(_) => "AERO_CONFIG_INVALID",
            QueryError::Store(e) => e.code(),
        }
    }

    /// Returns true for type-validation errors
    pub fn is_type_error(&self) -> bool {
        self.kind() == ErrorKind::TypeValidation
    }

    pub(crate) fn invalid_type(
        op: &'static str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        QueryError::TypeValidation {
            op,
            expected,
            actual,
        }
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> Self {
        QueryError::InvalidQuery(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            QueryError::invalid_type("<", "string, number", "boolean").kind(),
            ErrorKind::TypeValidation
        );
        assert_eq!(
            QueryError::InvalidCombineWith("xor".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            QueryError::from(StoreError::Unavailable("down".into())).kind(),
            ErrorKind::Store
        );
    }

    #[test]
    fn test_store_error_passes_through() {
        let err = QueryError::from(StoreError::FailedPrecondition("index missing".into()));
        assert_eq!(format!("{}", err), "failed precondition: index missing");
        assert_eq!(err.code(), "AERO_STORE_FAILED_PRECONDITION");
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::InvalidCombineWith("xor".into());
        assert!(format!("{}", err).contains("\"xor\""));

        let err = QueryError::TypeMismatch {
            op: "<",
            left: "string",
            right: "number",
        };
        assert!(format!("{}", err).contains("string against number"));
        assert!(err.is_type_error());
    }
}
