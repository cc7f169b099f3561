//! Execution strategy selection
//!
//! The store's filter engine handles AND-combined native operators only.
//! Any OR clause or advanced operator forces a full stream with client-side
//! evaluation.

use std::fmt;

use crate::query::{classifier, CombineWith, FilterClause, Query};

/// How a query gets executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Filters forwarded to the store, one materialized batch
    Native,
    /// Base query streamed, filters evaluated per record
    Stream,
}

impl ExecutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStrategy::Native => "native",
            ExecutionStrategy::Stream => "stream",
        }
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a clause cannot run natively, if it cannot
pub fn stream_reason(clause: &FilterClause) -> Option<String> {
    if classifier::combine_with_operator(clause) == CombineWith::Or {
        return Some(format!("{} is OR-combined", clause.field));
    }
    if classifier::is_advanced_operator(clause.op) {
        return Some(format!(
            "{} uses advanced operator '{}'",
            clause.field, clause.op
        ));
    }
    None
}

/// True when at least one clause is OR-combined or uses an advanced operator.
///
/// Stops at the first such clause.
pub fn should_use_stream(query: &Query) -> bool {
    query.clauses().iter().any(|clause| {
        classifier::combine_with_operator(clause) == CombineWith::Or
            || classifier::is_advanced_operator(clause.op)
    })
}

pub fn select_strategy(query: &Query) -> ExecutionStrategy {
    if should_use_stream(query) {
        ExecutionStrategy::Stream
    } else {
        ExecutionStrategy::Native
    }
}
