//! Rules of a mapping schema.
//!
//! A mapping schema is an ordered list of [`Rule`]s. Each variant corresponds
//! to one rule name; rules are evaluated in the order they were listed and the
//! first failing rule decides the error.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Error;
use crate::path::Path;
use crate::value::Value;

use super::{Interval, Schema};

/// Field schemas of the `hash`, `hash_req` and `hash_opt` rules, keyed by the
/// mapping key they apply to.
pub type Fields = IndexMap<Value, Schema>;

type AssertionFn = dyn Fn(&Value, &Path) -> Result<bool, Error> + Send + Sync;

/// A user-supplied predicate run by the `assertions` rule.
///
/// The predicate receives the value and the path of the assertion itself.
/// Returning `Ok(false)` fails with "custom assertion failed"; returning an
/// [`Error::Invalid`] fails with that error's rendered message instead, which
/// lets a predicate validate nested parts with its own schema.
///
/// # Example
///
/// ```rust
/// use conform::{validate, Assertion, Rule, Schema, Value};
///
/// let even = Assertion::new(|value, _path| {
///     Ok(matches!(value, Value::Int(i) if i % 2 == 0))
/// });
/// let schema = Schema::rules([Rule::Assertions(vec![even])]);
///
/// assert!(validate(&Value::Int(4), &schema).is_ok());
/// assert!(validate(&Value::Int(3), &schema).is_err());
/// ```
#[derive(Clone)]
pub struct Assertion(Arc<AssertionFn>);

impl Assertion {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Path) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn check(&self, value: &Value, path: &Path) -> Result<bool, Error> {
        (*self.0)(value, path)
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Assertion(..)")
    }
}

/// One named constraint inside a mapping schema.
#[derive(Debug, Clone)]
pub enum Rule {
    /// The sequence length must lie within the interval.
    Size(Interval),
    /// The mapping's keys, in iteration order, as a sequence.
    Keys(Schema),
    /// The mapping's values, in iteration order, as a sequence.
    Values(Schema),
    /// The mapping's keys, sorted, as a sequence.
    KeysSorted(Schema),
    /// Exactly these keys (minus sibling `hash_opt` keys), each validated.
    Hash(Fields),
    /// At least these keys, each validated; extra keys are allowed.
    HashReq(Fields),
    /// These keys are validated when present.
    HashOpt(Fields),
    /// Every element of a sequence, or every `[key, value]` pair of a mapping.
    Each(Schema),
    EachKey(Schema),
    EachValue(Schema),
    /// The result of each named accessor.
    Method(Vec<(String, Schema)>),
    Assertions(Vec<Assertion>),
}

impl Rule {
    pub fn size(interval: impl Into<Interval>) -> Self {
        Rule::Size(interval.into())
    }

    pub fn keys(schema: impl Into<Schema>) -> Self {
        Rule::Keys(schema.into())
    }

    pub fn values(schema: impl Into<Schema>) -> Self {
        Rule::Values(schema.into())
    }

    pub fn keys_sorted(schema: impl Into<Schema>) -> Self {
        Rule::KeysSorted(schema.into())
    }

    /// Creates a `hash` rule from `(key, schema)` pairs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conform::{validate, Rule, Schema, TypeTag, Value};
    ///
    /// let schema = Schema::rules([Rule::hash([
    ///     ("a", Schema::of(TypeTag::Integer)),
    ///     ("b", Schema::of(TypeTag::String)),
    /// ])]);
    ///
    /// assert!(validate(&Value::map([("a", Value::Int(1)), ("b", "x".into())]), &schema).is_ok());
    /// assert!(validate(&Value::map([("a", 1)]), &schema).is_err());
    /// ```
    pub fn hash<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Value>,
        S: Into<Schema>,
    {
        Rule::Hash(collect_fields(fields))
    }

    pub fn hash_req<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Value>,
        S: Into<Schema>,
    {
        Rule::HashReq(collect_fields(fields))
    }

    pub fn hash_opt<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<Value>,
        S: Into<Schema>,
    {
        Rule::HashOpt(collect_fields(fields))
    }

    pub fn each(schema: impl Into<Schema>) -> Self {
        Rule::Each(schema.into())
    }

    pub fn each_key(schema: impl Into<Schema>) -> Self {
        Rule::EachKey(schema.into())
    }

    pub fn each_value(schema: impl Into<Schema>) -> Self {
        Rule::EachValue(schema.into())
    }

    pub fn method<I, N, S>(accessors: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<Schema>,
    {
        Rule::Method(
            accessors
                .into_iter()
                .map(|(name, schema)| (name.into(), schema.into()))
                .collect(),
        )
    }

    /// Creates an `assertions` rule holding a single predicate.
    pub fn assertion<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &Path) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Rule::Assertions(vec![Assertion::new(predicate)])
    }

    /// The rule name as written in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Size(_) => "size",
            Rule::Keys(_) => "keys",
            Rule::Values(_) => "values",
            Rule::KeysSorted(_) => "keys_sorted",
            Rule::Hash(_) => "hash",
            Rule::HashReq(_) => "hash_req",
            Rule::HashOpt(_) => "hash_opt",
            Rule::Each(_) => "each",
            Rule::EachKey(_) => "each_key",
            Rule::EachValue(_) => "each_value",
            Rule::Method(_) => "method",
            Rule::Assertions(_) => "assertions",
        }
    }

    /// Returns true if this rule only makes sense against a mapping.
    pub(crate) fn implies_mapping(&self) -> bool {
        matches!(self, Rule::Keys(_) | Rule::EachKey(_) | Rule::EachValue(_))
    }

    /// Returns true if this rule only makes sense against a sequence.
    pub(crate) fn implies_sequence(&self) -> bool {
        matches!(self, Rule::Size(_))
    }
}

fn collect_fields<I, K, S>(fields: I) -> Fields
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<Value>,
    S: Into<Schema>,
{
    fields
        .into_iter()
        .map(|(key, schema)| (key.into(), schema.into()))
        .collect()
}
