//! Query structures
//!
//! A query is caller-supplied and immutable for the duration of one run:
//! filter clauses, an optional ordering, limit/offset and pagination cursors.

use crate::value::DocValue;

use super::operator::{CombineWith, Operator};

/// A single filter clause (field + operator + value)
#[derive(Debug, Clone, PartialEq)]
pub struct FilterClause {
    /// Field name, dotted paths allowed
    pub field: String,
    /// Comparison operator
    pub op: Operator,
    /// Scalar for equality/ordering/like, [low, high] for ranges, list for membership
    pub value: DocValue,
    /// Combination mode, AND when absent
    pub combine_with: Option<CombineWith>,
}

impl FilterClause {
    /// Create a clause with no explicit combination mode
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<DocValue>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            combine_with: None,
        }
    }

    /// Create an OR-combined clause
    pub fn or(field: impl Into<String>, op: Operator, value: impl Into<DocValue>) -> Self {
        Self::new(field, op, value).with_combine(CombineWith::Or)
    }

    /// Set the combination mode
    pub fn with_combine(mut self, mode: CombineWith) -> Self {
        self.combine_with = Some(mode);
        self
    }
}

/// The filter of a query: one clause or an ordered list
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    Single(FilterClause),
    List(Vec<FilterClause>),
}

impl Where {
    /// Clauses in declared order
    pub fn clauses(&self) -> &[FilterClause] {
        match self {
            Where::Single(clause) => std::slice::from_ref(clause),
            Where::List(clauses) => clauses,
        }
    }

    fn push(self, clause: FilterClause) -> Where {
        match self {
            Where::Single(first) => Where::List(vec![first, clause]),
            Where::List(mut clauses) => {
                clauses.push(clause);
                Where::List(clauses)
            }
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Order-by specification
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub dir: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            dir: Direction::Desc,
        }
    }
}

/// Pagination boundary: opaque values forwarded positionally to the store
#[derive(Debug, Clone, PartialEq)]
pub struct Cursor(Vec<DocValue>);

impl Cursor {
    /// Cursor over an ordered list of values
    pub fn new(values: Vec<DocValue>) -> Self {
        Self(values)
    }

    /// Cursor over a single value
    pub fn at(value: impl Into<DocValue>) -> Self {
        Self(vec![value.into()])
    }

    pub fn values(&self) -> &[DocValue] {
        &self.0
    }
}

/// A query against one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Option<Where>,
    pub order_by: Option<OrderBy>,
    /// 0 means unlimited
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub start_after: Option<Cursor>,
    pub start_at: Option<Cursor>,
    pub end_at: Option<Cursor>,
    pub end_before: Option<Cursor>,
}

impl Query {
    /// An empty query matches every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattened clause list in declared order
    pub fn clauses(&self) -> &[FilterClause] {
        match &self.filter {
            Some(filter) => filter.clauses(),
            None => &[],
        }
    }

    /// Limit with 0 folded into "unlimited"
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.filter(|&limit| limit > 0)
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Append a clause
    pub fn filter(mut self, clause: FilterClause) -> Self {
        self.filter = Some(match self.filter.take() {
            None => Where::Single(clause),
            Some(existing) => existing.push(clause),
        });
        self
    }

    /// Append a clause without an explicit combination mode (AND)
    pub fn and(self, field: &str, op: Operator, value: impl Into<DocValue>) -> Self {
        self.filter(FilterClause::new(field, op, value))
    }

    /// Append an OR-combined clause
    pub fn or(self, field: &str, op: Operator, value: impl Into<DocValue>) -> Self {
        self.filter(FilterClause::or(field, op, value))
    }

    pub fn order_by(mut self, field: &str, dir: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.to_string(),
            dir,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn start_after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    pub fn start_at(mut self, cursor: Cursor) -> Self {
        self.start_at = Some(cursor);
        self
    }

    pub fn end_at(mut self, cursor: Cursor) -> Self {
        self.end_at = Some(cursor);
        self
    }

    pub fn end_before(mut self, cursor: Cursor) -> Self {
        self.end_before = Some(cursor);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_clauses() {
        assert!(Query::new().clauses().is_empty());
    }

    #[test]
    fn test_builder_keeps_clause_order() {
        let query = Query::new()
            .and("age", Operator::Gte, 18)
            .or("role", Operator::Eq, "admin")
            .and("name", Operator::Like, "son");

        let fields: Vec<_> = query.clauses().iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["age", "role", "name"]);
        assert_eq!(query.clauses()[1].combine_with, Some(CombineWith::Or));
        assert_eq!(query.clauses()[0].combine_with, None);
    }

    #[test]
    fn test_single_clause_stays_single() {
        let query = Query::new().and("age", Operator::Gt, 1);
        assert!(matches!(query.filter, Some(Where::Single(_))));
        assert_eq!(query.clauses().len(), 1);
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        assert_eq!(Query::new().limit(0).effective_limit(), None);
        assert_eq!(Query::new().limit(3).effective_limit(), Some(3));
        assert_eq!(Query::new().effective_limit(), None);
    }

    #[test]
    fn test_cursors_are_independent() {
        let query = Query::new()
            .start_after(Cursor::at(1))
            .start_at(Cursor::at(2));
        assert_eq!(query.start_after, Some(Cursor::at(1)));
        assert_eq!(query.start_at, Some(Cursor::at(2)));
    }
}
