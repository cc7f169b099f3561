//! Typed comparator
//!
//! One predicate per operator. Operands are checked against the operator's
//! allowed types before comparing; nothing is coerced.
//!
//! | Operator            | value              | other                     |
//! |---------------------|--------------------|---------------------------|
//! | eq / not_eq         | any                | any                       |
//! | lt / lte / gt / gte | string or number   | same kind as value        |
//! | like                | string             | string                    |
//! | is_in / not_in      | string or number   | array of string or number |
//! | array_contains      | array of str / num | string or number          |
//! | between variants    | number             | [low, high] numbers       |
//!
//! Values are expected to be normalized (see [`DocValue::to_primitives`]),
//! so a raw timestamp is rejected like any other non-primitive.

use std::cmp::Ordering;

use crate::errors::{QueryError, QueryResult};
use crate::query::Operator;
use crate::value::DocValue;

const STRING_OR_NUMBER: &str = "string, number";
const STRING: &str = "string";
const NUMBER: &str = "number";

/// Stateless predicate evaluator
#[derive(Debug, Clone, Copy, Default)]
pub struct Comparator;

/// A value that passed the string-or-number check
#[derive(Debug, Clone, Copy)]
enum Primitive<'a> {
    Str(&'a str),
    Num(f64),
}

impl Primitive<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Primitive::Str(_) => STRING,
            Primitive::Num(_) => NUMBER,
        }
    }
}

impl Comparator {
    pub fn new() -> Self {
        Comparator
    }

    /// Evaluates `value <op> other`
    pub fn compare(&self, op: Operator, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        match op {
            Operator::Eq => Ok(self.eq(value, other)),
            Operator::NotEq => Ok(self.not_eq(value, other)),
            Operator::Lt => self.lt(value, other),
            Operator::Lte => self.lte(value, other),
            Operator::Gt => self.gt(value, other),
            Operator::Gte => self.gte(value, other),
            Operator::Like => self.like(value, other),
            Operator::In => self.is_in(value, other),
            Operator::NotIn => self.not_in(value, other),
            Operator::ArrayContains => self.array_contains(value, other),
            Operator::BetweenOpen => self.between_open(value, other),
            Operator::BetweenClose => self.between_close(value, other),
            Operator::NotBetweenOpen => self.not_between_open(value, other),
            Operator::NotBetweenClose => self.not_between_close(value, other),
        }
    }

    /// Strict equality, any type
    pub fn eq(&self, value: &DocValue, other: &DocValue) -> bool {
        value == other
    }

    /// Strict inequality, any type
    pub fn not_eq(&self, value: &DocValue, other: &DocValue) -> bool {
        value != other
    }

    pub fn lt(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let ord = self.order(Operator::Lt, value, other)?;
        Ok(ord == Some(Ordering::Less))
    }

    pub fn lte(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let ord = self.order(Operator::Lte, value, other)?;
        Ok(matches!(ord, Some(Ordering::Less | Ordering::Equal)))
    }

    pub fn gt(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let ord = self.order(Operator::Gt, value, other)?;
        Ok(ord == Some(Ordering::Greater))
    }

    pub fn gte(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let ord = self.order(Operator::Gte, value, other)?;
        Ok(matches!(ord, Some(Ordering::Greater | Ordering::Equal)))
    }

    /// True iff `other` is a substring of `value`
    pub fn like(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let op = Operator::Like.as_str();
        let haystack = value
            .as_str()
            .ok_or_else(|| QueryError::invalid_type(op, STRING, value.type_name()))?;
        let needle = other
            .as_str()
            .ok_or_else(|| QueryError::invalid_type(op, STRING, other.type_name()))?;

        Ok(haystack.contains(needle))
    }

    /// True iff `value` occurs in the `other` list
    pub fn is_in(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        self.membership(Operator::In, value, other)
    }

    /// True iff `value` does not occur in the `other` list
    pub fn not_in(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        self.membership(Operator::NotIn, value, other).map(|found| !found)
    }

    /// True iff the `value` array holds `other`
    pub fn array_contains(&self, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let op = Operator::ArrayContains.as_str();
        let items = primitive_array(op, value)?;
        primitive(op, other)?;

        Ok(items.contains(other))
    }

    /// low < value < high
    pub fn between_open(&self, value: &DocValue, range: &DocValue) -> QueryResult<bool> {
        let (v, low, high) = self.range(Operator::BetweenOpen, value, range)?;
        Ok(low < v && high > v)
    }

    /// low <= value <= high
    pub fn between_close(&self, value: &DocValue, range: &DocValue) -> QueryResult<bool> {
        let (v, low, high) = self.range(Operator::BetweenClose, value, range)?;
        Ok(low <= v && high >= v)
    }

    /// value <= low or value >= high (both endpoints count as outside)
    pub fn not_between_open(&self, value: &DocValue, range: &DocValue) -> QueryResult<bool> {
        let (v, low, high) = self.range(Operator::NotBetweenOpen, value, range)?;
        Ok(low >= v || high <= v)
    }

    /// value < low or value > high (both endpoints count as inside)
    pub fn not_between_close(&self, value: &DocValue, range: &DocValue) -> QueryResult<bool> {
        let (v, low, high) = self.range(Operator::NotBetweenClose, value, range)?;
        Ok(low > v || high < v)
    }

    /// Orders two primitives of the same kind. None when a number is NaN.
    fn order(
        &self,
        op: Operator,
        value: &DocValue,
        other: &DocValue,
    ) -> QueryResult<Option<Ordering>> {
        let op = op.as_str();
        let left = primitive(op, value)?;
        let right = primitive(op, other)?;

        match (left, right) {
            (Primitive::Str(a), Primitive::Str(b)) => Ok(Some(a.cmp(b))),
            (Primitive::Num(a), Primitive::Num(b)) => Ok(a.partial_cmp(&b)),
            (l, r) => Err(QueryError::TypeMismatch {
                op,
                left: l.kind(),
                right: r.kind(),
            }),
        }
    }

    fn membership(&self, op: Operator, value: &DocValue, other: &DocValue) -> QueryResult<bool> {
        let op = op.as_str();
        primitive(op, value)?;
        let items = primitive_array(op, other)?;

        Ok(items.contains(value))
    }

    fn range(
        &self,
        op: Operator,
        value: &DocValue,
        range: &DocValue,
    ) -> QueryResult<(f64, f64, f64)> {
        let op = op.as_str();
        let v = number(op, value)?;
        let bounds = range
            .as_array()
            .ok_or_else(|| QueryError::invalid_type(op, "array", range.type_name()))?;
        let bounds = bounds
            .iter()
            .map(|b| number(op, b))
            .collect::<QueryResult<Vec<f64>>>()?;

        match bounds.as_slice() {
            [low, high] => Ok((v, *low, *high)),
            _ => Err(QueryError::RangeArity {
                op,
                len: bounds.len(),
            }),
        }
    }
}

fn primitive<'a>(op: &'static str, value: &'a DocValue) -> QueryResult<Primitive<'a>> {
    match value {
        DocValue::String(s) => Ok(Primitive::Str(s)),
        DocValue::Number(n) => Ok(Primitive::Num(*n)),
        other => Err(QueryError::invalid_type(op, STRING_OR_NUMBER, other.type_name())),
    }
}

fn primitive_array<'a>(op: &'static str, value: &'a DocValue) -> QueryResult<&'a [DocValue]> {
    let items = value
        .as_array()
        .ok_or_else(|| QueryError::invalid_type(op, "array", value.type_name()))?;
    for item in items {
        primitive(op, item)?;
    }
    Ok(items)
}

fn number(op: &'static str, value: &DocValue) -> QueryResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| QueryError::invalid_type(op, NUMBER, value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn v(value: serde_json::Value) -> DocValue {
        DocValue::from(value)
    }

    #[test]
    fn test_equality_any_type() {
        let c = Comparator::new();
        assert!(c.eq(&v(json!(true)), &v(json!(true))));
        assert!(c.eq(&v(json!(null)), &v(json!(null))));
        assert!(!c.eq(&v(json!(1)), &v(json!("1"))));
        assert!(c.not_eq(&v(json!(1)), &v(json!("1"))));
        assert!(c.eq(&v(json!([1, 2])), &v(json!([1, 2]))));
    }

    #[test]
    fn test_ordering_numbers_and_strings() {
        let c = Comparator::new();
        assert!(c.lt(&v(json!(1)), &v(json!(2))).unwrap());
        assert!(!c.lt(&v(json!(2)), &v(json!(2))).unwrap());
        assert!(c.lte(&v(json!(2)), &v(json!(2))).unwrap());
        assert!(c.gt(&v(json!("b")), &v(json!("a"))).unwrap());
        assert!(c.gte(&v(json!("a")), &v(json!("a"))).unwrap());
        assert!(!c.gt(&v(json!("B")), &v(json!("a"))).unwrap());
    }

    #[test]
    fn test_ordering_rejects_mixed_kinds() {
        let c = Comparator::new();
        let err = c.lt(&v(json!("a")), &v(json!(5))).unwrap_err();
        assert!(matches!(
            err,
            QueryError::TypeMismatch { left: "string", right: "number", .. }
        ));
    }

    #[test]
    fn test_ordering_rejects_non_primitives() {
        let c = Comparator::new();
        assert!(c.gt(&v(json!(true)), &v(json!(1))).unwrap_err().is_type_error());
        assert!(c.gte(&v(json!(1)), &v(json!(null))).unwrap_err().is_type_error());
        assert!(c.lte(&v(json!([1])), &v(json!(1))).unwrap_err().is_type_error());

        let raw_ts = DocValue::Timestamp(Utc.timestamp_millis_opt(1).unwrap());
        assert!(c.lt(&raw_ts, &v(json!(1))).is_err());
    }

    #[test]
    fn test_nan_never_orders() {
        let c = Comparator::new();
        let nan = DocValue::Number(f64::NAN);
        assert!(!c.lt(&nan, &v(json!(1))).unwrap());
        assert!(!c.gte(&nan, &v(json!(1))).unwrap());
    }

    #[test]
    fn test_like_is_substring() {
        let c = Comparator::new();
        assert!(c.like(&v(json!("Johnson")), &v(json!("son"))).unwrap());
        assert!(c.like(&v(json!("Johnson")), &v(json!(""))).unwrap());
        assert!(!c.like(&v(json!("Smith")), &v(json!("son"))).unwrap());
        assert!(c.like(&v(json!(5)), &v(json!("5"))).is_err());
        assert!(c.like(&v(json!("5")), &v(json!(5))).is_err());
    }

    #[test]
    fn test_membership() {
        let c = Comparator::new();
        let list = v(json!(["a", 2]));
        assert!(c.is_in(&v(json!("a")), &list).unwrap());
        assert!(c.is_in(&v(json!(2)), &list).unwrap());
        assert!(!c.is_in(&v(json!("2")), &list).unwrap());
        assert!(c.not_in(&v(json!(3)), &list).unwrap());
        assert!(!c.not_in(&v(json!("a")), &list).unwrap());
    }

    #[test]
    fn test_membership_validates_list() {
        let c = Comparator::new();
        assert!(c.is_in(&v(json!(1)), &v(json!(1))).is_err());
        assert!(c.is_in(&v(json!(1)), &v(json!([1, true]))).is_err());
        assert!(c.not_in(&v(json!(null)), &v(json!([1]))).is_err());
    }

    #[test]
    fn test_array_contains() {
        let c = Comparator::new();
        let tags = v(json!(["rust", "db"]));
        assert!(c.array_contains(&tags, &v(json!("db"))).unwrap());
        assert!(!c.array_contains(&tags, &v(json!("go"))).unwrap());
        assert!(c.array_contains(&v(json!("rust")), &v(json!("rust"))).is_err());
        assert!(c.array_contains(&tags, &v(json!(["db"]))).is_err());
    }

    #[test]
    fn test_range_validation() {
        let c = Comparator::new();
        assert!(c.between_close(&v(json!("5")), &v(json!([1, 10]))).is_err());
        assert!(c.between_close(&v(json!(5)), &v(json!([1, "10"]))).is_err());

        let err = c.between_open(&v(json!(5)), &v(json!([1, 5, 10]))).unwrap_err();
        assert!(matches!(err, QueryError::RangeArity { len: 3, .. }));

        let err = c.between_open(&v(json!(5)), &v(json!([1]))).unwrap_err();
        assert!(matches!(err, QueryError::RangeArity { len: 1, .. }));
    }

    #[test]
    fn test_range_not_sorted() {
        let c = Comparator::new();
        // [high, low] as supplied: nothing lies strictly inside
        assert!(!c.between_close(&v(json!(5)), &v(json!([10, 1]))).unwrap());
        assert!(c.not_between_close(&v(json!(5)), &v(json!([10, 1]))).unwrap());
    }

    #[test]
    fn test_compare_dispatch() {
        let c = Comparator::new();
        for op in Operator::ALL {
            let (value, other) = if op.is_range() {
                (v(json!(5)), v(json!([1, 10])))
            } else {
                match op {
                    Operator::In | Operator::NotIn => (v(json!(5)), v(json!([5]))),
                    Operator::ArrayContains => (v(json!([5])), v(json!(5))),
                    Operator::Like => (v(json!("5")), v(json!("5"))),
                    _ => (v(json!(5)), v(json!(5))),
                }
            };
            assert!(c.compare(op, &value, &other).is_ok(), "{} failed", op);
        }
    }
}
