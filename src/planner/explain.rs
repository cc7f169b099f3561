//! Explain output for the routing decision
//!
//! Deterministic, human-readable description of how a query would run.

use std::fmt;

use crate::query::{classifier, Query};

use super::strategy::{select_strategy, stream_reason, ExecutionStrategy};

/// Explain plan output
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainPlan {
    /// Chosen execution path
    pub strategy: ExecutionStrategy,
    /// Clauses handed to the store's filter engine
    pub native_filters: Vec<String>,
    /// Clauses evaluated per streamed record
    pub client_clauses: Vec<String>,
    /// Why streaming was chosen, one line per offending clause
    pub reasons: Vec<String>,
    /// Sort description
    pub order_by: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl ExplainPlan {
    pub fn from_query(query: &Query) -> Self {
        let strategy = select_strategy(query);
        let described: Vec<String> = query
            .clauses()
            .iter()
            .map(|c| {
                format!(
                    "{} {} {} {}",
                    classifier::combine_with_operator(c),
                    c.field,
                    c.op,
                    c.value.to_json()
                )
            })
            .collect();

        let (native_filters, client_clauses) = match strategy {
            ExecutionStrategy::Native => (described, Vec::new()),
            ExecutionStrategy::Stream => (Vec::new(), described),
        };

        Self {
            strategy,
            native_filters,
            client_clauses,
            reasons: query.clauses().iter().filter_map(stream_reason).collect(),
            order_by: query
                .order_by
                .as_ref()
                .map(|o| format!("{} {}", o.field, o.dir.as_str())),
            limit: query.effective_limit(),
            offset: query.offset,
        }
    }
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;
        writeln!(f, "Strategy: {}", self.strategy.as_str().to_uppercase())?;

        if !self.native_filters.is_empty() {
            writeln!(f, "Native Filters:")?;
            for clause in &self.native_filters {
                writeln!(f, "  - {}", clause)?;
            }
        }
        if !self.client_clauses.is_empty() {
            writeln!(f, "Client Clauses:")?;
            for clause in &self.client_clauses {
                writeln!(f, "  - {}", clause)?;
            }
        }
        if !self.reasons.is_empty() {
            writeln!(f, "Reasons:")?;
            for reason in &self.reasons {
                writeln!(f, "  - {}", reason)?;
            }
        }
        if let Some(order_by) = &self.order_by {
            writeln!(f, "Order By: {}", order_by)?;
        }
        match self.limit {
            Some(limit) => writeln!(f, "Limit: {}", limit)?,
            None => writeln!(f, "Limit: none")?,
        }
        if let Some(offset) = self.offset {
            writeln!(f, "Offset: {}", offset)?;
        }

        Ok(())
    }
}
