//! Fixture generation: synthesize a value that satisfies a schema.
//!
//! The generator mirrors the rule engine's dispatch, producing instead of
//! checking. It supports a deliberate subset of schemas:
//!
//! | Schema | Fixture |
//! |---|---|
//! | literal | the literal |
//! | rules `{hash}` | every field generated, keys shuffled |
//! | rules `{hash_req}` | every field plus one extra pair, keys shuffled |
//! | rules `{size, each}` | a sequence whose length is drawn from `size` |
//! | tuple | one value per position |
//! | union | a random variant |
//! | pattern | an example from the [`PatternExamples`] provider |
//! | interval | a uniform draw |
//! | `Integer`, `String`, `Hash`, `Boolean` | see [`Fixtures::generate`] |
//!
//! Anything else fails with a [`FixtureError`] rather than producing a value
//! that might not validate.
//!
//! # Example
//!
//! ```rust
//! use conform::fixture::Fixtures;
//! use conform::{validate, Rule, Schema, TypeTag};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let schema = Schema::rules([Rule::hash([
//!     ("id", Schema::of(TypeTag::Integer)),
//!     ("tags", Schema::rules([Rule::size(1..=3), Rule::each(Schema::pattern(r"\A[a-z]+\z").unwrap())])),
//! ])]);
//!
//! let value = Fixtures::new(StdRng::seed_from_u64(1)).generate(&schema).unwrap();
//! assert!(validate(&value, &schema).is_ok());
//! ```

mod pattern;
mod uri;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;

use crate::error::FixtureError;
use crate::schema::{Fields, Interval, Rule, Schema, TypeTag};
use crate::value::Value;

pub use pattern::{HirExamples, PatternExamples, DEFAULT_MAX_REPEAT};

/// Number of random bytes behind a `String` fixture.
const RANDOM_TEXT_BYTES: usize = 1000;

/// Integer fixtures are drawn from `(-INTEGER_SPAN, 0]`.
const INTEGER_SPAN: i64 = 1_000_000;

/// The extra pair a `hash_req` fixture carries.
const EXTRA_KEY: &str = "foo";
const EXTRA_VALUE: &str = "bar";

/// Generates a fixture with a thread-local random source.
pub fn fixture(schema: &Schema) -> Result<Value, FixtureError> {
    Fixtures::new(rand::thread_rng()).generate(schema)
}

/// A fixture generator over a random source.
///
/// Use a seeded generator such as `StdRng::seed_from_u64` for reproducible
/// fixtures.
pub struct Fixtures<R> {
    rng: R,
    shuffle: bool,
    patterns: Box<dyn PatternExamples>,
}

impl<R: Rng> Fixtures<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            shuffle: true,
            patterns: Box::new(HirExamples::new()),
        }
    }

    /// Keeps mapping fixtures in schema order instead of shuffling keys.
    pub fn no_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Replaces the pattern-example provider.
    pub fn with_patterns(mut self, patterns: impl PatternExamples + 'static) -> Self {
        self.patterns = Box::new(patterns);
        self
    }

    /// Generates one value satisfying `schema`.
    ///
    /// Type tags map to fixed generators: `Integer` yields a non-positive
    /// integer, `String` yields random bytes decoded lossily as UTF-8,
    /// `Hash` yields an empty mapping and `Boolean` yields `true`.
    pub fn generate(&mut self, schema: &Schema) -> Result<Value, FixtureError> {
        trace!(kind = schema.kind(), "generating fixture");
        match schema {
            Schema::Literal(literal) => Ok(literal.to_value()),
            Schema::Type(tag) => self.generate_type(tag),
            Schema::Pattern(regex) => {
                let example = self.patterns.example(regex, &mut self.rng)?;
                Ok(Value::Str(uri::normalize(example, regex)))
            }
            Schema::Interval(interval) => self.draw(interval),
            Schema::Rules(rules) => self.generate_rules(rules),
            Schema::Tuple(elements) => elements
                .iter()
                .map(|element| self.generate(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Seq),
            Schema::Union(variants) => {
                let variant = variants
                    .choose(&mut self.rng)
                    .ok_or(FixtureError::EmptyUnion)?;
                self.generate(variant)
            }
        }
    }

    fn generate_type(&mut self, tag: &TypeTag) -> Result<Value, FixtureError> {
        match tag {
            TypeTag::Integer => Ok(Value::Int(-self.rng.gen_range(0..INTEGER_SPAN))),
            TypeTag::String => {
                let mut bytes = vec![0u8; RANDOM_TEXT_BYTES];
                self.rng.fill(&mut bytes[..]);
                Ok(Value::Str(String::from_utf8_lossy(&bytes).into_owned()))
            }
            TypeTag::Hash => Ok(Value::Map(IndexMap::new())),
            TypeTag::Boolean => Ok(Value::Bool(true)),
            other => Err(FixtureError::UnsupportedType(other.clone())),
        }
    }

    fn generate_rules(&mut self, rules: &[Rule]) -> Result<Value, FixtureError> {
        match rules {
            [Rule::Hash(fields)] => {
                let entries = self.generate_fields(fields)?;
                Ok(self.assemble(entries))
            }
            [Rule::HashReq(fields)] => {
                let mut entries = self.generate_fields(fields)?;
                entries.push((extra_key(fields), Value::from(EXTRA_VALUE)));
                Ok(self.assemble(entries))
            }
            [Rule::Size(size), Rule::Each(element)] | [Rule::Each(element), Rule::Size(size)] => {
                let len = self.draw_len(size)?;
                (0..len)
                    .map(|_| self.generate(element))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Seq)
            }
            _ => Err(FixtureError::UnsupportedRules(
                rules.iter().map(Rule::name).collect(),
            )),
        }
    }

    fn generate_fields(&mut self, fields: &Fields) -> Result<Vec<(Value, Value)>, FixtureError> {
        fields
            .iter()
            .map(|(key, schema)| Ok((key.clone(), self.generate(schema)?)))
            .collect()
    }

    fn assemble(&mut self, mut entries: Vec<(Value, Value)>) -> Value {
        if self.shuffle {
            entries.shuffle(&mut self.rng);
        }
        Value::Map(entries.into_iter().collect())
    }

    fn draw(&mut self, interval: &Interval) -> Result<Value, FixtureError> {
        let empty = || FixtureError::EmptyInterval(interval.to_string());
        match (&interval.start, &interval.end) {
            (Value::Int(lo), Value::Int(hi)) => {
                if lo > hi {
                    return Err(empty());
                }
                Ok(Value::Int(self.rng.gen_range(*lo..=*hi)))
            }
            (lo @ (Value::Int(_) | Value::Float(_)), hi @ (Value::Int(_) | Value::Float(_))) => {
                let (lo, hi) = (as_f64(lo), as_f64(hi));
                if !lo.is_finite() || !hi.is_finite() || lo > hi {
                    return Err(empty());
                }
                Ok(Value::Float(self.rng.gen_range(lo..=hi)))
            }
            _ => Err(FixtureError::UnsupportedSchema(format!("interval {}", interval))),
        }
    }

    fn draw_len(&mut self, size: &Interval) -> Result<usize, FixtureError> {
        match (&size.start, &size.end) {
            (Value::Int(lo), Value::Int(hi)) => {
                let lo = (*lo).max(0);
                if lo > *hi {
                    return Err(FixtureError::EmptyInterval(size.to_string()));
                }
                let len = self.rng.gen_range(lo..=*hi);
                Ok(usize::try_from(len).unwrap_or(0))
            }
            _ => Err(FixtureError::UnsupportedSchema(format!("size {}", size))),
        }
    }
}

fn as_f64(value: &Value) -> f64 {
    match value {
        Value::Int(i) => *i as f64,
        Value::Float(x) => *x,
        _ => f64::NAN,
    }
}

/// The extra `hash_req` key, renamed until it does not collide with a field.
fn extra_key(fields: &Fields) -> Value {
    let mut key = Value::from(EXTRA_KEY);
    let mut n = 0;
    while fields.contains_key(&key) {
        n += 1;
        key = Value::from(format!("{}{}", EXTRA_KEY, n));
    }
    key
}
