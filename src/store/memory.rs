//! In-memory document store
//!
//! Reference implementation of [`DocumentStore`]: native filters, ordering,
//! cursors, offset and limit over collections held in memory, plus a
//! cancellable streaming read. Faults can be injected to exercise error paths.
//!
//! Store-side semantics follow a typical document store:
//! - a native filter on a missing field or across value kinds never matches
//! - ordering drops documents that lack the order-by field
//! - inequality filters may only target one field

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde_json::Value;
use uuid::Uuid;

use crate::query::{Direction, NativeOperator, OrderBy};
use crate::value::{DocValue, Document};

use super::errors::{StoreError, StoreResult};
use super::query::{NativeFilter, StoreQuery};
use super::stream::{record_channel, RecordStream};
use super::{DocumentStore, StoreFuture};

#[derive(Debug, Default)]
struct Faults {
    /// Returned by the next `get`
    get: Option<StoreError>,
    /// Raised by the next stream after this many records
    stream: Option<(usize, StoreError)>,
}

/// Documents grouped by collection, in insertion order
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    faults: Mutex<Faults>,
    streamed: Arc<AtomicU64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `{"<collection>": [{"id": .., ..fields}, ..], ..}`.
    ///
    /// Records without a string `id` get a generated one.
    pub fn from_json(value: &Value) -> StoreResult<Self> {
        let collections = value.as_object().ok_or_else(|| {
            StoreError::InvalidArgument("dataset must be an object of collections".into())
        })?;

        let store = Self::new();
        for (name, records) in collections {
            let records = records.as_array().ok_or_else(|| {
                StoreError::InvalidArgument(format!("collection '{}' must be an array", name))
            })?;
            for record in records {
                store.insert_json(name, record.clone())?;
            }
        }
        Ok(store)
    }

    /// Appends a document to a collection
    pub fn insert(&self, collection: &str, document: Document) {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    /// Appends a JSON object, returning its ID
    pub fn insert_json(&self, collection: &str, value: Value) -> StoreResult<String> {
        let document = Document::from_json(Uuid::new_v4().to_string(), value).ok_or_else(|| {
            StoreError::InvalidArgument(format!("records in '{}' must be objects", collection))
        })?;
        let id = document.id.clone();
        self.insert(collection, document);
        Ok(id)
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Total records handed to stream readers so far
    pub fn streamed(&self) -> u64 {
        self.streamed.load(AtomicOrdering::Relaxed)
    }

    /// Makes the next `get` fail with `error`
    pub fn fail_next_get(&self, error: StoreError) {
        self.faults().get = Some(error);
    }

    /// Makes the next stream fail with `error` after delivering `after` records
    pub fn fail_next_stream(&self, after: usize, error: StoreError) {
        self.faults().stream = Some((after, error));
    }

    fn faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs the query against the current contents
    fn select(&self, query: &StoreQuery) -> StoreResult<Vec<Document>> {
        check_inequality_fields(&query.filters)?;

        let mut docs: Vec<Document> = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&query.collection)
            .cloned()
            .unwrap_or_default();

        docs.retain(|doc| query.filters.iter().all(|f| native_match(doc, f)));

        if let Some(order_by) = &query.order_by {
            docs.retain(|doc| doc.get(&order_by.field).is_some());
            docs.sort_by(|a, b| {
                let ord = compare_keys(&sort_key(a, Some(order_by)), &sort_key(b, Some(order_by)));
                apply_direction(ord, order_by.dir)
            });
        }

        let order_by = query.order_by.as_ref();
        docs.retain(|doc| {
            let after = |cursor: &Option<Vec<DocValue>>, keep: fn(Ordering) -> bool| {
                cursor
                    .as_ref()
                    .map_or(true, |values| keep(cursor_position(doc, values, order_by)))
            };
            after(&query.start_at, |o| o != Ordering::Less)
                && after(&query.start_after, |o| o == Ordering::Greater)
                && after(&query.end_at, |o| o != Ordering::Greater)
                && after(&query.end_before, |o| o == Ordering::Less)
        });

        let offset = query.offset.unwrap_or(0) as usize;
        let docs = docs.into_iter().skip(offset);
        Ok(match query.limit {
            Some(limit) => docs.take(limit as usize).collect(),
            None => docs.collect(),
        })
    }
}

impl DocumentStore for MemoryStore {
    fn get<'a>(&'a self, query: &'a StoreQuery) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            if let Some(error) = self.faults().get.take() {
                return Err(error);
            }
            self.select(query)
        })
    }

    fn stream(&self, query: &StoreQuery, buffer: usize) -> RecordStream {
        let (sender, stream) = record_channel(buffer);
        let selected = self.select(query);
        let fault = self.faults().stream.take();
        let streamed = Arc::clone(&self.streamed);

        tokio::spawn(async move {
            let docs = match selected {
                Ok(docs) => docs,
                Err(error) => return sender.fail(error).await,
            };
            let total = docs.len();

            for (index, doc) in docs.into_iter().enumerate() {
                if let Some((at, error)) = &fault {
                    if *at == index {
                        return sender.fail(error.clone()).await;
                    }
                }
                if !sender.send(doc).await {
                    return;
                }
                streamed.fetch_add(1, AtomicOrdering::Relaxed);
            }

            if let Some((at, error)) = fault {
                if at >= total {
                    sender.fail(error).await;
                }
            }
        });

        stream
    }
}

fn check_inequality_fields(filters: &[NativeFilter]) -> StoreResult<()> {
    let fields: BTreeSet<&str> = filters
        .iter()
        .filter(|f| {
            matches!(
                f.op,
                NativeOperator::Lt | NativeOperator::Lte | NativeOperator::Gt | NativeOperator::Gte
            )
        })
        .map(|f| f.field.as_str())
        .collect();

    if fields.len() > 1 {
        let names: Vec<&str> = fields.into_iter().collect();
        return Err(StoreError::InvalidArgument(format!(
            "inequality filters must target a single field, got: {}",
            names.join(", ")
        )));
    }
    Ok(())
}

fn native_match(doc: &Document, filter: &NativeFilter) -> bool {
    let Some(actual) = doc.get(&filter.field) else {
        return false;
    };
    let expected = &filter.value;

    match filter.op {
        NativeOperator::Eq => actual == expected,
        NativeOperator::ArrayContains => actual
            .as_array()
            .map_or(false, |items| items.contains(expected)),
        NativeOperator::Lt => same_kind_cmp(actual, expected) == Some(Ordering::Less),
        NativeOperator::Lte => matches!(
            same_kind_cmp(actual, expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        NativeOperator::Gt => same_kind_cmp(actual, expected) == Some(Ordering::Greater),
        NativeOperator::Gte => matches!(
            same_kind_cmp(actual, expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
    }
}

fn same_kind_cmp(a: &DocValue, b: &DocValue) -> Option<Ordering> {
    match (a, b) {
        (DocValue::Number(x), DocValue::Number(y)) => x.partial_cmp(y),
        (DocValue::String(x), DocValue::String(y)) => Some(x.cmp(y)),
        (DocValue::Bool(x), DocValue::Bool(y)) => Some(x.cmp(y)),
        (DocValue::Timestamp(x), DocValue::Timestamp(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Rank of each value kind in the store's cross-type ordering
fn type_rank(value: &DocValue) -> u8 {
    match value {
        DocValue::Null => 0,
        DocValue::Bool(_) => 1,
        DocValue::Number(_) => 2,
        DocValue::Timestamp(_) => 3,
        DocValue::String(_) => 4,
        DocValue::Array(_) => 5,
        DocValue::Map(_) => 6,
    }
}

/// Total order over values: kind first, then value
fn total_cmp(a: &DocValue, b: &DocValue) -> Ordering {
    match (a, b) {
        (DocValue::Number(x), DocValue::Number(y)) => x.total_cmp(y),
        (DocValue::Timestamp(x), DocValue::Timestamp(y)) => x.cmp(y),
        (DocValue::Array(x), DocValue::Array(y)) => compare_keys(x, y),
        (DocValue::Map(x), DocValue::Map(y)) => x.len().cmp(&y.len()),
        _ => same_kind_cmp(a, b).unwrap_or_else(|| type_rank(a).cmp(&type_rank(b))),
    }
}

fn compare_keys(a: &[DocValue], b: &[DocValue]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        let ord = total_cmp(x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn apply_direction(ord: Ordering, dir: Direction) -> Ordering {
    match dir {
        Direction::Asc => ord,
        Direction::Desc => ord.reverse(),
    }
}

/// Ordering key: the order-by field then the document ID
fn sort_key(doc: &Document, order_by: Option<&OrderBy>) -> Vec<DocValue> {
    let mut key = Vec::with_capacity(2);
    if let Some(order_by) = order_by {
        key.push(doc.get(&order_by.field).cloned().unwrap_or_default());
    }
    key.push(DocValue::String(doc.id.clone()));
    key
}

/// Where the document sits relative to the cursor, in query order.
///
/// Cursor values are matched positionally against the sort key; a shorter
/// cursor compares only its prefix.
fn cursor_position(doc: &Document, cursor: &[DocValue], order_by: Option<&OrderBy>) -> Ordering {
    let key = sort_key(doc, order_by);
    let len = cursor.len().min(key.len());
    let ord = compare_keys(&key[..len], &cursor[..len]);
    apply_direction(ord, order_by.map_or(Direction::Asc, |o| o.dir))
}
