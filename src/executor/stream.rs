//! Stream execution engine
//!
//! Records arrive one at a time from the store. Each is matched against the
//! full clause list, then offset and limit are applied to matches only. The
//! engine settles exactly once: resolved on limit or natural end, rejected on
//! a store or type-validation error. Every event after settlement is ignored.

use futures_util::StreamExt;

use crate::errors::{QueryError, QueryResult};
use crate::observability::{log_event, Event, MetricsRegistry};
use crate::query::Query;
use crate::store::{RecordStream, StoreError};
use crate::value::Document;

use super::matcher::ClauseMatcher;

/// Something the store's stream reported
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Data(Document),
    Error(StoreError),
    End,
}

impl StreamEvent {
    fn kind(&self) -> &'static str {
        match self {
            StreamEvent::Data(_) => "data",
            StreamEvent::Error(_) => "error",
            StreamEvent::End => "end",
        }
    }
}

/// Settlement of a streamed query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Settlement {
    #[default]
    Streaming,
    Resolved,
    Rejected,
}

/// Running counters of a streamed query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Matches seen so far, including those skipped by the offset
    pub matched_index: u64,
    /// Matches appended to the results
    pub satisfied_count: u64,
    pub settled: Settlement,
}

/// Outcome of feeding one event to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep reading
    Continue,
    /// Results are final; `limit_reached` means the stream should be ended
    Resolved { limit_reached: bool },
    /// Arrived after settlement, dropped
    Ignored,
}

/// Incremental matcher over one query's stream
#[derive(Debug)]
pub struct StreamEngine<'q> {
    matcher: ClauseMatcher<'q>,
    offset: u64,
    limit: Option<u64>,
    state: StreamState,
    results: Vec<Document>,
}

impl<'q> StreamEngine<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self {
            matcher: ClauseMatcher::new(query.clauses()),
            offset: query.offset.unwrap_or(0),
            limit: query.effective_limit(),
            state: StreamState::default(),
            results: Vec::new(),
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Advance the state machine by one event
    pub fn on_event(&mut self, event: StreamEvent) -> QueryResult<Step> {
        if self.state.settled != Settlement::Streaming {
            return Ok(Step::Ignored);
        }

        match event {
            StreamEvent::Data(doc) => match self.matcher.matches(&doc) {
                Ok(true) => Ok(self.accept(doc)),
                Ok(false) => Ok(Step::Continue),
                Err(e) => Err(self.reject(e)),
            },
            StreamEvent::Error(e) => Err(self.reject(QueryError::Store(e))),
            StreamEvent::End => {
                self.state.settled = Settlement::Resolved;
                Ok(Step::Resolved {
                    limit_reached: false,
                })
            }
        }
    }

    fn accept(&mut self, doc: Document) -> Step {
        if self.state.matched_index < self.offset {
            self.state.matched_index += 1;
            return Step::Continue;
        }

        self.results.push(doc);
        self.state.matched_index += 1;
        self.state.satisfied_count += 1;

        if self.limit == Some(self.state.satisfied_count) {
            self.state.settled = Settlement::Resolved;
            return Step::Resolved {
                limit_reached: true,
            };
        }
        Step::Continue
    }

    fn reject(&mut self, error: QueryError) -> QueryError {
        self.state.settled = Settlement::Rejected;
        self.results.clear();
        error
    }

    /// Accumulated results. Empty unless resolved.
    pub fn into_results(self) -> Vec<Document> {
        match self.state.settled {
            Settlement::Resolved => self.results,
            Settlement::Streaming | Settlement::Rejected => Vec::new(),
        }
    }
}

/// Drive `stream` through a [`StreamEngine`] until it settles.
///
/// The stream is ended as soon as the engine settles early. Anything still
/// buffered afterwards is drained and ignored.
pub async fn run_stream(
    query: &Query,
    mut stream: RecordStream,
    metrics: &MetricsRegistry,
) -> QueryResult<Vec<Document>> {
    let mut engine = StreamEngine::new(query);

    let outcome = loop {
        let event = match stream.next().await {
            Some(Ok(doc)) => {
                metrics.increment_records_scanned();
                StreamEvent::Data(doc)
            }
            Some(Err(e)) => StreamEvent::Error(e),
            None => StreamEvent::End,
        };

        match engine.on_event(event) {
            Ok(Step::Continue) | Ok(Step::Ignored) => continue,
            Ok(Step::Resolved { limit_reached }) => {
                if limit_reached {
                    stream.end();
                    metrics.increment_streams_ended_early();
                    log_event(
                        Event::StreamLimitReached,
                        &[("limit", &engine.state().satisfied_count.to_string())],
                    );
                }
                break Ok(());
            }
            Err(e) => {
                stream.end();
                break Err(e);
            }
        }
    };

    while let Some(item) = stream.next().await {
        let event = match item {
            Ok(doc) => StreamEvent::Data(doc),
            Err(e) => StreamEvent::Error(e),
        };
        let kind = event.kind();
        if let Ok(Step::Ignored) = engine.on_event(event) {
            log_event(Event::StreamLateEventIgnored, &[("kind", kind)]);
        }
    }

    metrics.add_records_matched(engine.state().matched_index);

    outcome.map(|()| engine.into_results())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;

    fn doc(id: &str, x: i32) -> Document {
        Document::new(id).with("x", x)
    }

    fn feed(engine: &mut StreamEngine<'_>, docs: Vec<Document>) -> Vec<QueryResult<Step>> {
        docs.into_iter()
            .map(|d| engine.on_event(StreamEvent::Data(d)))
            .collect()
    }

    #[test]
    fn test_resolves_on_end() {
        let query = Query::new().and("x", Operator::NotEq, 2);
        let mut engine = StreamEngine::new(&query);

        feed(&mut engine, vec![doc("a", 1), doc("b", 2), doc("c", 3)]);
        assert_eq!(
            engine.on_event(StreamEvent::End).unwrap(),
            Step::Resolved {
                limit_reached: false
            }
        );

        let ids: Vec<_> = engine.into_results().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_limit_settles_and_ignores_rest() {
        let query = Query::new().and("x", Operator::Gt, 0).limit(2);
        let mut engine = StreamEngine::new(&query);

        let steps = feed(&mut engine, vec![doc("a", 1), doc("b", 2), doc("c", 3)]);
        assert_eq!(steps[0].as_ref().unwrap(), &Step::Continue);
        assert_eq!(
            steps[1].as_ref().unwrap(),
            &Step::Resolved {
                limit_reached: true
            }
        );
        assert_eq!(steps[2].as_ref().unwrap(), &Step::Ignored);

        // Late error after resolution is swallowed
        assert_eq!(
            engine
                .on_event(StreamEvent::Error(StoreError::Internal("late".into())))
                .unwrap(),
            Step::Ignored
        );
        assert_eq!(engine.state().settled, Settlement::Resolved);
        assert_eq!(engine.into_results().len(), 2);
    }

    #[test]
    fn test_offset_counts_matches_only() {
        let query = Query::new().and("x", Operator::In, vec![1, 3, 5]).offset(2);
        let mut engine = StreamEngine::new(&query);

        feed(
            &mut engine,
            (1..=6).map(|i| doc(&i.to_string(), i)).collect(),
        );
        engine.on_event(StreamEvent::End).unwrap();

        assert_eq!(
            *engine.state(),
            StreamState {
                matched_index: 3,
                satisfied_count: 1,
                settled: Settlement::Resolved,
            }
        );
        let ids: Vec<_> = engine.into_results().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["5"]);
    }

    #[test]
    fn test_offset_past_matches_is_empty() {
        let query = Query::new().and("x", Operator::Eq, 1).offset(5);
        let mut engine = StreamEngine::new(&query);

        feed(&mut engine, vec![doc("a", 1), doc("b", 1)]);
        engine.on_event(StreamEvent::End).unwrap();
        assert!(engine.into_results().is_empty());
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let query = Query::new().limit(0);
        let mut engine = StreamEngine::new(&query);

        let steps = feed(&mut engine, vec![doc("a", 1), doc("b", 2)]);
        assert!(steps.iter().all(|s| s.as_ref().unwrap() == &Step::Continue));
    }

    #[test]
    fn test_store_error_rejects_without_partial_results() {
        let query = Query::new();
        let mut engine = StreamEngine::new(&query);

        feed(&mut engine, vec![doc("a", 1)]);
        let err = engine
            .on_event(StreamEvent::Error(StoreError::Unavailable("down".into())))
            .unwrap_err();
        assert_eq!(err.code(), "AERO_STORE_UNAVAILABLE");
        assert_eq!(engine.state().settled, Settlement::Rejected);

        assert_eq!(engine.on_event(StreamEvent::End).unwrap(), Step::Ignored);
        assert!(engine.into_results().is_empty());
    }

    #[test]
    fn test_type_error_rejects() {
        let query = Query::new().and("x", Operator::Like, "1");
        let mut engine = StreamEngine::new(&query);

        let err = engine.on_event(StreamEvent::Data(doc("a", 1))).unwrap_err();
        assert!(err.is_type_error());
        assert_eq!(engine.state().settled, Settlement::Rejected);
    }

    #[tokio::test]
    async fn test_run_stream_ends_on_limit() {
        let query = Query::new().limit(1);
        let stream = RecordStream::from_results(vec![
            Ok(doc("a", 1)),
            Ok(doc("b", 2)),
            Err(StoreError::Internal("late".into())),
        ]);
        let metrics = MetricsRegistry::new();

        let results = run_stream(&query, stream, &metrics).await.unwrap();
        assert_eq!(results.len(), 1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.records_scanned, 1);
        assert_eq!(snapshot.records_matched, 1);
        assert_eq!(snapshot.streams_ended_early, 1);
    }

    #[tokio::test]
    async fn test_run_stream_surfaces_store_error() {
        let query = Query::new();
        let stream = RecordStream::from_results(vec![
            Ok(doc("a", 1)),
            Err(StoreError::PermissionDenied("no".into())),
        ]);

        let err = run_stream(&query, stream, &MetricsRegistry::new())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Store(StoreError::PermissionDenied(_))));
    }
}
