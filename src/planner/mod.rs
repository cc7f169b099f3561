//! Query planning
//!
//! Decides per query whether the store's own filter engine can answer it or
//! whether records must be streamed and matched client-side.

mod explain;
mod strategy;

pub use explain::ExplainPlan;
pub use strategy::{select_strategy, should_use_stream, stream_reason, ExecutionStrategy};
