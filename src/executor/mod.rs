//! Query execution
//!
//! Two paths, chosen per query by the planner:
//!
//! - Native: AND-combined native clauses go to the store's filter engine,
//!   with limit and offset, in one round trip
//! - Stream: the base query (order and cursors only) is streamed and every
//!   record is matched client-side until the limit is met or the stream ends

mod matcher;
mod native;
mod runner;
mod stream;

pub use matcher::ClauseMatcher;
pub use native::{build_native_query, run_native};
pub use runner::QueryRunner;
pub use stream::{run_stream, Settlement, Step, StreamEngine, StreamEvent, StreamState};
