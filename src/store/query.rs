//! Store-side query: what the store's own filter engine receives

use crate::query::{NativeOperator, OrderBy};
use crate::value::DocValue;

/// A filter the store evaluates itself
#[derive(Debug, Clone, PartialEq)]
pub struct NativeFilter {
    pub field: String,
    pub op: NativeOperator,
    pub value: DocValue,
}

/// Query handed to a [`DocumentStore`](super::DocumentStore)
///
/// Built up one call at a time, in the order the store applies them.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub collection: String,
    pub filters: Vec<NativeFilter>,
    pub order_by: Option<OrderBy>,
    pub start_after: Option<Vec<DocValue>>,
    pub start_at: Option<Vec<DocValue>>,
    pub end_at: Option<Vec<DocValue>>,
    pub end_before: Option<Vec<DocValue>>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl StoreQuery {
    /// Whole-collection query
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            start_after: None,
            start_at: None,
            end_at: None,
            end_before: None,
            limit: None,
            offset: None,
        }
    }

    pub fn filter(mut self, field: impl Into<String>, op: NativeOperator, value: DocValue) -> Self {
        self.filters.push(NativeFilter {
            field: field.into(),
            op,
            value,
        });
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn start_after(mut self, values: &[DocValue]) -> Self {
        self.start_after = Some(values.to_vec());
        self
    }

    pub fn start_at(mut self, values: &[DocValue]) -> Self {
        self.start_at = Some(values.to_vec());
        self
    }

    pub fn end_at(mut self, values: &[DocValue]) -> Self {
        self.end_at = Some(values.to_vec());
        self
    }

    pub fn end_before(mut self, values: &[DocValue]) -> Self {
        self.end_before = Some(values.to_vec());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }
}
