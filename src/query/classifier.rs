//! Operator classification
//!
//! Pure lookups: is an operator native to the store, does it need
//! client-side evaluation, and how does a clause combine with its siblings.

use crate::errors::QueryResult;

use super::ast::FilterClause;
use super::operator::{CombineWith, Operator};

/// True when the store can evaluate the operator itself
pub fn is_native_operator(op: Operator) -> bool {
    op.native().is_some()
}

/// True when the operator needs client-side evaluation
pub fn is_advanced_operator(op: Operator) -> bool {
    !is_native_operator(op)
}

/// True when the symbol names an operator of the closed set
pub fn is_valid_operator(symbol: &str) -> bool {
    Operator::parse(symbol).is_ok()
}

/// The clause's combination mode, AND when absent
pub fn combine_with_operator(clause: &FilterClause) -> CombineWith {
    clause.combine_with.unwrap_or_default()
}

/// Validates a raw combination mode.
///
/// Absent or empty means AND; anything other than "and"/"or" is rejected.
pub fn parse_combine_with(raw: Option<&str>) -> QueryResult<CombineWith> {
    match raw {
        None | Some("") => Ok(CombineWith::And),
        Some(mode) => CombineWith::parse(mode),
    }
}
