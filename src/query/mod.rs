//! Query model
//!
//! Filter clauses, the closed operator set, combination modes, ordering,
//! pagination cursors and the JSON loader.

mod ast;
pub mod classifier;
mod loader;
mod operator;

pub use ast::{Cursor, Direction, FilterClause, OrderBy, Query, Where};
pub use classifier::{
    combine_with_operator, is_advanced_operator, is_native_operator, is_valid_operator,
    parse_combine_with,
};
pub use operator::{CombineWith, NativeOperator, Operator};
