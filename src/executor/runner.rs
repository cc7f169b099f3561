//! Query runner
//!
//! Entry point for executing a [`Query`] against a collection: picks the
//! strategy, runs the matching path, logs the outcome and updates metrics.

use std::sync::Arc;

use crate::config::RunnerConfig;
use crate::errors::QueryResult;
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::planner::{select_strategy, ExecutionStrategy};
use crate::query::Query;
use crate::store::{DocumentStore, StoreQuery};
use crate::value::Document;

use super::native::run_native;
use super::stream::run_stream;

/// Runs queries against one document store
pub struct QueryRunner {
    store: Arc<dyn DocumentStore>,
    config: RunnerConfig,
    metrics: Arc<MetricsRegistry>,
}

impl QueryRunner {
    pub fn new(store: impl DocumentStore + 'static) -> Self {
        Self::with_shared(Arc::new(store))
    }

    /// Runner over a store that is also used elsewhere
    pub fn with_shared(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: RunnerConfig::default(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Order-by and the four cursors, each bound to its own option
    pub fn create_base_query(&self, collection: &str, query: &Query) -> StoreQuery {
        let mut base = StoreQuery::new(collection);
        if let Some(order_by) = &query.order_by {
            base = base.order_by(order_by.clone());
        }
        if let Some(cursor) = &query.start_after {
            base = base.start_after(cursor.values());
        }
        if let Some(cursor) = &query.start_at {
            base = base.start_at(cursor.values());
        }
        if let Some(cursor) = &query.end_at {
            base = base.end_at(cursor.values());
        }
        if let Some(cursor) = &query.end_before {
            base = base.end_before(cursor.values());
        }
        base
    }

    /// Execute the query and return matching documents in store order
    pub async fn run(&self, collection: &str, query: &Query) -> QueryResult<Vec<Document>> {
        log_event(
            Event::QueryBegin,
            &[
                ("clauses", &query.clauses().len().to_string()),
                ("collection", collection),
            ],
        );

        let strategy = select_strategy(query);
        log_event(
            Event::QueryPlanned,
            &[("collection", collection), ("strategy", strategy.as_str())],
        );

        let base = self.create_base_query(collection, query);
        let result = match strategy {
            ExecutionStrategy::Native => {
                self.metrics.increment_queries_native();
                run_native(self.store.as_ref(), base, query).await
            }
            ExecutionStrategy::Stream => {
                self.metrics.increment_queries_streamed();
                let stream = self.store.stream(&base, self.config.stream_buffer);
                log_event(
                    Event::StreamOpened,
                    &[
                        ("buffer", &self.config.stream_buffer.to_string()),
                        ("collection", collection),
                    ],
                );
                run_stream(query, stream, &self.metrics).await
            }
        };

        match &result {
            Ok(docs) => {
                self.metrics.increment_queries_completed();
                log_event(
                    Event::QueryComplete,
                    &[
                        ("collection", collection),
                        ("rows", &docs.len().to_string()),
                        ("strategy", strategy.as_str()),
                    ],
                );
            }
            Err(e) => {
                self.metrics.increment_queries_rejected();
                log_event(
                    Event::QueryRejected,
                    &[
                        ("code", e.code()),
                        ("collection", collection),
                        ("message", &e.to_string()),
                    ],
                );
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Cursor, Direction, Operator};
    use crate::store::MemoryStore;
    use crate::value::DocValue;
    use serde_json::json;

    fn runner() -> QueryRunner {
        let store = MemoryStore::from_json(&json!({
            "items": [
                {"id": "a", "n": 1},
                {"id": "b", "n": 2},
                {"id": "c", "n": 3},
                {"id": "d", "n": 4}
            ]
        }))
        .unwrap();
        QueryRunner::new(store)
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_base_query_binds_each_cursor() {
        let query = Query::new()
            .order_by("n", Direction::Asc)
            .start_after(Cursor::at(1))
            .start_at(Cursor::at(2))
            .end_at(Cursor::at(4))
            .end_before(Cursor::at(5));

        let base = runner().create_base_query("items", &query);
        assert_eq!(base.start_after, Some(vec![DocValue::from(1)]));
        assert_eq!(base.start_at, Some(vec![DocValue::from(2)]));
        assert_eq!(base.end_at, Some(vec![DocValue::from(4)]));
        assert_eq!(base.end_before, Some(vec![DocValue::from(5)]));
        assert!(base.filters.is_empty());
        assert_eq!(base.limit, None);
    }

    #[tokio::test]
    async fn test_native_route() {
        let runner = runner();
        let query = Query::new().and("n", Operator::Gt, 2);

        assert_eq!(ids(&runner.run("items", &query).await.unwrap()), vec!["c", "d"]);
        let snapshot = runner.metrics().snapshot();
        assert_eq!(snapshot.queries_native, 1);
        assert_eq!(snapshot.queries_completed, 1);
    }

    #[tokio::test]
    async fn test_stream_route() {
        let runner = runner();
        let query = Query::new().and("n", Operator::NotEq, 2).limit(2);

        assert_eq!(ids(&runner.run("items", &query).await.unwrap()), vec!["a", "c"]);
        let snapshot = runner.metrics().snapshot();
        assert_eq!(snapshot.queries_streamed, 1);
        assert_eq!(snapshot.streams_ended_early, 1);
    }

    #[tokio::test]
    async fn test_rejection_counted() {
        let runner = runner();
        let query = Query::new().and("n", Operator::Like, "1");

        assert!(runner.run("items", &query).await.is_err());
        assert_eq!(runner.metrics().snapshot().queries_rejected, 1);
    }
}
