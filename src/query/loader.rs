//! JSON query loading
//!
//! Wire shape:
//!
//! ```text
//! {
//!   "where": clause | [clause],
//!   "orderBy": {"field": "age", "dir": "asc" | "desc"},
//!   "limit": 10, "offset": 0,
//!   "startAfter": v | [v..], "startAt": .., "endAt": .., "endBefore": ..
//! }
//! clause = {"field": "age", "op": "between[]", "value": [18, 30], "combineWith": "and" | "or"}
//! ```
//!
//! Operators and combination modes are validated here, before the store is touched.

use serde::Deserialize;
use serde_json::Value;

use crate::errors::{QueryError, QueryResult};
use crate::value::DocValue;

use super::ast::{Cursor, Direction, FilterClause, OrderBy, Query, Where};
use super::classifier::parse_combine_with;
use super::operator::Operator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawQuery {
    #[serde(rename = "where")]
    filter: Option<RawWhere>,
    order_by: Option<RawOrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    start_after: Option<DocValue>,
    start_at: Option<DocValue>,
    end_at: Option<DocValue>,
    end_before: Option<DocValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWhere {
    List(Vec<RawClause>),
    Single(RawClause),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClause {
    field: String,
    op: String,
    #[serde(default)]
    value: DocValue,
    combine_with: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOrderBy {
    field: String,
    dir: Option<String>,
}

impl RawClause {
    fn into_clause(self) -> QueryResult<FilterClause> {
        let op = Operator::parse(&self.op)?;
        let mode = parse_combine_with(self.combine_with.as_deref())?;

        Ok(FilterClause {
            field: self.field,
            op,
            value: self.value,
            combine_with: self.combine_with.map(|_| mode),
        })
    }
}

fn to_cursor(value: Option<DocValue>) -> Option<Cursor> {
    value.map(|v| match v {
        DocValue::Array(items) => Cursor::new(items),
        single => Cursor::new(vec![single]),
    })
}

fn to_order_by(raw: RawOrderBy) -> QueryResult<OrderBy> {
    let dir = match raw.dir.as_deref() {
        None | Some("asc") => Direction::Asc,
        Some("desc") => Direction::Desc,
        Some(other) => {
            return Err(QueryError::InvalidQuery(format!(
                "orderBy.dir must be \"asc\" or \"desc\", got \"{}\"",
                other
            )))
        }
    };
    Ok(OrderBy {
        field: raw.field,
        dir,
    })
}

impl Query {
    /// Load a query from its JSON form
    pub fn from_json(value: &Value) -> QueryResult<Query> {
        let raw: RawQuery = serde_json::from_value(value.clone())?;

        let filter = match raw.filter {
            None => None,
            Some(RawWhere::Single(clause)) => Some(Where::Single(clause.into_clause()?)),
            Some(RawWhere::List(clauses)) => Some(Where::List(
                clauses
                    .into_iter()
                    .map(RawClause::into_clause)
                    .collect::<QueryResult<Vec<_>>>()?,
            )),
        };

        Ok(Query {
            filter,
            order_by: raw.order_by.map(to_order_by).transpose()?,
            limit: raw.limit,
            offset: raw.offset,
            start_after: to_cursor(raw.start_after),
            start_at: to_cursor(raw.start_at),
            end_at: to_cursor(raw.end_at),
            end_before: to_cursor(raw.end_before),
        })
    }

    /// Load a query from JSON text
    pub fn parse_json(text: &str) -> QueryResult<Query> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}
