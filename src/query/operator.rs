//! Filter operators and clause combination modes
//!
//! The operator set is closed. Native operators run inside the store's own
//! filter engine; every other operator needs client-side evaluation.

use std::fmt;
use std::str::FromStr;

use crate::errors::{QueryError, QueryResult};

/// Comparison operator of a filter clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<`
    Lt,
    /// `<=`
    Lte,
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `>`
    Gt,
    /// `>=`
    Gte,
    /// `array-contains`: the record's array holds the value
    ArrayContains,
    /// `like`: substring match
    Like,
    /// `in`: the record's value is one of the listed values
    In,
    /// `!in`
    NotIn,
    /// `between()`: low < v < high
    BetweenOpen,
    /// `between[]`: low <= v <= high
    BetweenClose,
    /// `!between()`: v <= low or v >= high
    NotBetweenOpen,
    /// `!between[]`: v < low or v > high
    NotBetweenClose,
}

impl Operator {
    /// Every operator, natives first
    pub const ALL: [Operator; 14] = [
        Operator::Lt,
        Operator::Lte,
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::ArrayContains,
        Operator::NotEq,
        Operator::Like,
        Operator::In,
        Operator::NotIn,
        Operator::BetweenOpen,
        Operator::BetweenClose,
        Operator::NotBetweenOpen,
        Operator::NotBetweenClose,
    ];

    /// Canonical symbol
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Eq => "==",
            Operator::NotEq => "!=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::ArrayContains => "array-contains",
            Operator::Like => "like",
            Operator::In => "in",
            Operator::NotIn => "!in",
            Operator::BetweenOpen => "between()",
            Operator::BetweenClose => "between[]",
            Operator::NotBetweenOpen => "!between()",
            Operator::NotBetweenClose => "!between[]",
        }
    }

    /// Parses an operator symbol. `!==` is accepted as an alias of `!=`.
    pub fn parse(s: &str) -> QueryResult<Operator> {
        if s == "!==" {
            return Ok(Operator::NotEq);
        }
        Operator::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| QueryError::InvalidOperator(s.to_string()))
    }

    /// Returns the store-side form when the store can evaluate this operator itself
    pub fn native(&self) -> Option<NativeOperator> {
        match self {
            Operator::Lt => Some(NativeOperator::Lt),
            Operator::Lte => Some(NativeOperator::Lte),
            Operator::Eq => Some(NativeOperator::Eq),
            Operator::Gt => Some(NativeOperator::Gt),
            Operator::Gte => Some(NativeOperator::Gte),
            Operator::ArrayContains => Some(NativeOperator::ArrayContains),
            Operator::NotEq
            | Operator::Like
            | Operator::In
            | Operator::NotIn
            | Operator::BetweenOpen
            | Operator::BetweenClose
            | Operator::NotBetweenOpen
            | Operator::NotBetweenClose => None,
        }
    }

    /// Returns true for the four between variants, whose value is a [low, high] pair
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Operator::BetweenOpen
                | Operator::BetweenClose
                | Operator::NotBetweenOpen
                | Operator::NotBetweenClose
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::parse(s)
    }
}

/// Operators the store evaluates natively
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeOperator {
    Lt,
    Lte,
    Eq,
    Gt,
    Gte,
    ArrayContains,
}

impl NativeOperator {
    pub fn as_str(&self) -> &'static str {
        Operator::from(*self).as_str()
    }
}

impl From<NativeOperator> for Operator {
    fn from(op: NativeOperator) -> Self {
        match op {
            NativeOperator::Lt => Operator::Lt,
            NativeOperator::Lte => Operator::Lte,
            NativeOperator::Eq => Operator::Eq,
            NativeOperator::Gt => Operator::Gt,
            NativeOperator::Gte => Operator::Gte,
            NativeOperator::ArrayContains => Operator::ArrayContains,
        }
    }
}

impl fmt::Display for NativeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a clause combines with its siblings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CombineWith {
    /// Every AND clause must match
    #[default]
    And,
    /// At least one OR clause must match
    Or,
}

impl CombineWith {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombineWith::And => "and",
            CombineWith::Or => "or",
        }
    }

    /// Parses "and" / "or". Anything else is a configuration error.
    pub fn parse(s: &str) -> QueryResult<CombineWith> {
        match s {
            "and" => Ok(CombineWith::And),
            "or" => Ok(CombineWith::Or),
            other => Err(QueryError::InvalidCombineWith(other.to_string())),
        }
    }
}

impl fmt::Display for CombineWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_parse_back() {
        for op in Operator::ALL {
            assert_eq!(Operator::parse(op.as_str()).unwrap(), op);
        }
    }

    #[test]
    fn test_strict_inequality_alias() {
        assert_eq!(Operator::parse("!==").unwrap(), Operator::NotEq);
        assert_eq!("!=".parse::<Operator>().unwrap(), Operator::NotEq);
    }

    #[test]
    fn test_unknown_operator() {
        let err = Operator::parse("~=").unwrap_err();
        assert!(matches!(err, QueryError::InvalidOperator(ref s) if s == "~="));
    }

    #[test]
    fn test_native_mapping() {
        assert_eq!(Operator::Gte.native(), Some(NativeOperator::Gte));
        assert_eq!(Operator::NotEq.native(), None);
        assert_eq!(Operator::from(NativeOperator::ArrayContains), Operator::ArrayContains);
        assert_eq!(NativeOperator::Lte.as_str(), "<=");
    }

    #[test]
    fn test_range_operators() {
        let ranges: Vec<_> = Operator::ALL.iter().filter(|op| op.is_range()).collect();
        assert_eq!(ranges.len(), 4);
    }

    #[test]
    fn test_combine_with_parse() {
        assert_eq!(CombineWith::parse("and").unwrap(), CombineWith::And);
        assert_eq!(CombineWith::parse("or").unwrap(), CombineWith::Or);
        assert!(CombineWith::parse("xor").is_err());
        assert!(CombineWith::parse("OR").is_err());
        assert_eq!(CombineWith::default(), CombineWith::And);
    }
}
