//! Schema definitions.
//!
//! A [`Schema`] is a closed sum type with one variant per shape. The matcher
//! and the fixture generator both dispatch on it exhaustively, so adding a
//! shape means touching both.
//!
//! # Example
//!
//! ```rust
//! use conform::{validate, Rule, Schema, TypeTag, Value};
//!
//! // A two-element tuple: a digit string and a small integer.
//! let row = Schema::tuple([
//!     Schema::pattern(r"\A\d+\z").unwrap(),
//!     Schema::interval(1..=5),
//! ]);
//!
//! assert!(validate(&Value::seq([Value::from("42"), Value::Int(3)]), &row).is_ok());
//! assert!(validate(&Value::seq([Value::from("42"), Value::Int(9)]), &row).is_err());
//!
//! // A mapping whose values are all integers or strings.
//! let table = Schema::rules([Rule::each_value(Schema::union([
//!     Schema::of(TypeTag::Integer),
//!     Schema::of(TypeTag::String),
//! ]))]);
//! assert!(validate(&Value::map([("a", Value::Int(1)), ("b", "x".into())]), &table).is_ok());
//! ```

mod interval;
mod rules;
mod scalar;

use std::ops::RangeInclusive;

use regex::Regex;

pub use interval::Interval;
pub use rules::{Assertion, Fields, Rule};
pub use scalar::{Literal, TypeTag};

/// A recursive description of the values that conform to it.
#[derive(Debug, Clone)]
pub enum Schema {
    /// The value must equal the literal.
    Literal(Literal),
    /// The value's runtime type must match the tag.
    Type(TypeTag),
    /// The value must be a string or symbol matching the pattern.
    Pattern(Regex),
    /// The value must lie within the interval.
    Interval(Interval),
    /// The value must satisfy every rule, checked in order.
    Rules(Vec<Rule>),
    /// The value must be a sequence with one element per schema.
    Tuple(Vec<Schema>),
    /// The value must satisfy at least one schema.
    Union(Vec<Schema>),
}

impl Schema {
    /// Matches only `nil`.
    pub fn nil() -> Self {
        Schema::Literal(Literal::Nil)
    }

    pub fn literal(literal: impl Into<Literal>) -> Self {
        Schema::Literal(literal.into())
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Schema::Literal(Literal::symbol(name))
    }

    /// Matches values of the given runtime type.
    pub fn of(tag: TypeTag) -> Self {
        Schema::Type(tag)
    }

    /// Compiles a pattern schema.
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Schema::Pattern(Regex::new(pattern)?))
    }

    pub fn interval(interval: impl Into<Interval>) -> Self {
        Schema::Interval(interval.into())
    }

    pub fn rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Schema::Rules(rules.into_iter().collect())
    }

    pub fn tuple<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Schema::Tuple(elements.into_iter().map(Into::into).collect())
    }

    pub fn union<I, S>(variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Schema>,
    {
        Schema::Union(variants.into_iter().map(Into::into).collect())
    }

    /// A short name for the shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Literal(_) => "literal",
            Schema::Type(_) => "type",
            Schema::Pattern(_) => "pattern",
            Schema::Interval(_) => "interval",
            Schema::Rules(_) => "rules",
            Schema::Tuple(_) => "tuple",
            Schema::Union(_) => "union",
        }
    }
}

impl From<Literal> for Schema {
    fn from(literal: Literal) -> Self {
        Schema::Literal(literal)
    }
}

impl From<TypeTag> for Schema {
    fn from(tag: TypeTag) -> Self {
        Schema::Type(tag)
    }
}

impl From<Regex> for Schema {
    fn from(regex: Regex) -> Self {
        Schema::Pattern(regex)
    }
}

impl From<Interval> for Schema {
    fn from(interval: Interval) -> Self {
        Schema::Interval(interval)
    }
}

impl From<RangeInclusive<i64>> for Schema {
    fn from(range: RangeInclusive<i64>) -> Self {
        Schema::Interval(range.into())
    }
}

impl From<RangeInclusive<f64>> for Schema {
    fn from(range: RangeInclusive<f64>) -> Self {
        Schema::Interval(range.into())
    }
}

impl From<Rule> for Schema {
    fn from(rule: Rule) -> Self {
        Schema::Rules(vec![rule])
    }
}

/// String slices are string literals.
impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Schema::Literal(Literal::from(s))
    }
}

impl From<bool> for Schema {
    fn from(b: bool) -> Self {
        Schema::Literal(Literal::Bool(b))
    }
}

impl From<()> for Schema {
    fn from(_: ()) -> Self {
        Schema::nil()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Schema>();
    assert_sync::<Schema>();
};
