//! aeroquery - extended-operator queries over a document store
//!
//! The store's own filter engine handles AND-combined comparisons
//! (`<`, `<=`, `==`, `>`, `>=`, `array-contains`). Queries that need OR
//! clauses or the advanced operators (`!=`, `in`, `!in`, `like` and the
//! between family) are streamed and matched client-side, with offset and
//! limit applied to matches and the stream ended as soon as the limit is met.

pub mod cli;
pub mod comparator;
pub mod config;
pub mod errors;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod query;
pub mod store;
pub mod value;

pub use comparator::Comparator;
pub use config::RunnerConfig;
pub use errors::{ErrorKind, QueryError, QueryResult};
pub use executor::QueryRunner;
pub use query::{CombineWith, Cursor, Direction, FilterClause, Operator, OrderBy, Query};
pub use store::{DocumentStore, MemoryStore, StoreError};
pub use value::{DocValue, Document};
