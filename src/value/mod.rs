//! Document value model
//!
//! Records arrive from the store as field mappings whose time-valued fields
//! are rich timestamps. Before any comparison, values are normalized with
//! [`DocValue::to_primitives`] so both sides compare on equal footing.

mod doc_value;
mod document;

pub use doc_value::{DocValue, TIMESTAMP_KEY};
pub use document::Document;
