//! # Document Store
//!
//! The seam between the query engine and whatever holds the documents.
//! A store offers two read paths:
//! - `get`: one-shot read with native filters, order, cursors, offset and limit
//! - `stream`: incremental read the caller can end early
//!
//! [`MemoryStore`] is the in-process implementation used by the CLI and tests.

mod errors;
mod memory;
mod query;
mod stream;

use std::future::Future;
use std::pin::Pin;

use crate::value::Document;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use query::{NativeFilter, StoreQuery};
pub use stream::{record_channel, RecordStream, StreamSender};

/// Boxed future returned by store reads
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// A queryable document store
pub trait DocumentStore: Send + Sync {
    /// Run the query with the store's own engine and return every result
    fn get<'a>(&'a self, query: &'a StoreQuery) -> StoreFuture<'a, Vec<Document>>;

    /// Open a stream over the query's results.
    ///
    /// At most `buffer` records are read ahead of the consumer.
    fn stream(&self, query: &StoreQuery, buffer: usize) -> RecordStream;
}
