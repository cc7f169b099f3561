//! Client-side clause evaluation
//!
//! A record matches when every AND clause matches and, if there are any OR
//! clauses, at least one of them does. Either group is vacuously true when
//! empty.

use crate::comparator::Comparator;
use crate::errors::{QueryError, QueryResult};
use crate::query::{classifier, CombineWith, FilterClause, Operator};
use crate::value::{DocValue, Document};

/// A clause with its comparison value already normalized
#[derive(Debug)]
struct PreparedClause<'q> {
    clause: &'q FilterClause,
    value: DocValue,
}

impl<'q> PreparedClause<'q> {
    fn new(clause: &'q FilterClause) -> Self {
        Self {
            clause,
            value: clause.value.to_primitives(),
        }
    }
}

/// Clauses of one query, partitioned once by combination mode
#[derive(Debug)]
pub struct ClauseMatcher<'q> {
    and_group: Vec<PreparedClause<'q>>,
    or_group: Vec<PreparedClause<'q>>,
    comparator: Comparator,
}

impl<'q> ClauseMatcher<'q> {
    pub fn new(clauses: &'q [FilterClause]) -> Self {
        let mut and_group = Vec::new();
        let mut or_group = Vec::new();

        for clause in clauses {
            match classifier::combine_with_operator(clause) {
                CombineWith::And => and_group.push(PreparedClause::new(clause)),
                CombineWith::Or => or_group.push(PreparedClause::new(clause)),
            }
        }

        Self {
            and_group,
            or_group,
            comparator: Comparator::new(),
        }
    }

    pub fn and_len(&self) -> usize {
        self.and_group.len()
    }

    pub fn or_len(&self) -> usize {
        self.or_group.len()
    }

    /// Evaluates the record. Type-validation errors propagate.
    ///
    /// Both groups are evaluated before combining, so a failing OR clause
    /// surfaces even when the AND group already rejects the record.
    pub fn matches(&self, doc: &Document) -> QueryResult<bool> {
        let all = self.matches_all(doc)?;
        let any = self.matches_one_of(doc)?;
        Ok(all && any)
    }

    /// AND group: every clause, vacuously true when empty
    fn matches_all(&self, doc: &Document) -> QueryResult<bool> {
        for prepared in &self.and_group {
            if !self.is_match(prepared, doc)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// OR group: any clause, vacuously true when empty
    fn matches_one_of(&self, doc: &Document) -> QueryResult<bool> {
        if self.or_group.is_empty() {
            return Ok(true);
        }
        for prepared in &self.or_group {
            if self.is_match(prepared, doc)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_match(&self, prepared: &PreparedClause<'_>, doc: &Document) -> QueryResult<bool> {
        let clause = prepared.clause;
        let Some(actual) = doc.get(&clause.field) else {
            return match clause.op {
                Operator::Eq => Ok(false),
                Operator::NotEq => Ok(true),
                op => Err(QueryError::MissingField {
                    op: op.as_str(),
                    field: clause.field.clone(),
                }),
            };
        };

        self.comparator
            .compare(clause.op, &actual.to_primitives(), &prepared.value)
    }
}
