//! Native execution path
//!
//! Every clause is AND-combined and native, so the store's own engine
//! answers the query in one round trip. Store errors come back unmodified.

use crate::errors::QueryResult;
use crate::query::{classifier, CombineWith, Query};
use crate::store::{DocumentStore, StoreQuery};
use crate::value::Document;

/// Add the query's filters, limit and offset to the base store query
pub fn build_native_query(base: StoreQuery, query: &Query) -> StoreQuery {
    let mut native = query
        .clauses()
        .iter()
        .filter(|c| classifier::combine_with_operator(c) == CombineWith::And)
        .filter_map(|c| c.op.native().map(|op| (c, op)))
        .fold(base, |q, (clause, op)| {
            q.filter(clause.field.as_str(), op, clause.value.clone())
        });

    if let Some(limit) = query.effective_limit() {
        native = native.limit(limit);
    }
    if let Some(offset) = query.offset {
        native = native.offset(offset);
    }
    native
}

pub async fn run_native(
    store: &dyn DocumentStore,
    base: StoreQuery,
    query: &Query,
) -> QueryResult<Vec<Document>> {
    let native = build_native_query(base, query);
    Ok(store.get(&native).await?)
}
