//! The rule engine.
//!
//! [`Validator`] walks a value and a [`Schema`] together, threading the
//! current [`Path`] through every recursive call. Scalar shapes are checked
//! here; mapping rules live in `rules` and tuple/union schemas in
//! `combinators`.
//!
//! Failures short-circuit: the first failing check is returned as-is, and the
//! only place errors are collected is a union whose branches all failed.

mod combinators;
mod rules;

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, ValidationError};
use crate::path::Path;
use crate::schema::Schema;
use crate::value::Value;

type HintFn = dyn Fn(&Value) -> String + Send + Sync;

/// Caller-supplied context appended to failure messages.
#[derive(Clone)]
enum Hint {
    Static(String),
    Dynamic(Arc<HintFn>),
}

/// Validation options and the recursive matcher.
///
/// A `Validator` holds no state between calls; the same instance can check
/// any number of values, from any number of threads.
///
/// # Example
///
/// ```rust
/// use conform::{Schema, TypeTag, Validator, Value};
///
/// let validator = Validator::new().with_message_fn(|value| format!("(got a {})", value.type_name()));
/// let err = validator
///     .validate(&Value::from("x"), &Schema::of(TypeTag::Integer))
///     .unwrap_err();
///
/// assert_eq!(err.to_string(), "expected Integer != String (got a String)");
/// ```
#[derive(Clone, Default)]
pub struct Validator {
    hint: Option<Hint>,
    max_depth: Option<usize>,
}

impl Validator {
    /// Creates a validator with no hint and no depth limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fixed message to every failure.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.hint = Some(Hint::Static(message.into()));
        self
    }

    /// Appends a message computed from the failing value to every failure.
    pub fn with_message_fn<F>(mut self, hint: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.hint = Some(Hint::Dynamic(Arc::new(hint)));
        self
    }

    /// Fails once a path grows beyond `depth` segments.
    ///
    /// Unbounded by default. Set this when schemas come from untrusted
    /// sources and may nest arbitrarily deep.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Validates `value` against `schema` from the root.
    pub fn validate(&self, value: &Value, schema: &Schema) -> Result<(), Error> {
        self.validate_at(value, schema, &Path::root())
    }

    /// Returns `Ok(false)` instead of a validation failure.
    ///
    /// Hard errors such as a missing accessor still propagate, so a malformed
    /// schema and an invalid value can only be told apart by the `Err` case.
    pub fn is_valid(&self, value: &Value, schema: &Schema) -> Result<bool, Error> {
        match self.validate(value, schema) {
            Ok(()) => Ok(true),
            Err(Error::Invalid(_)) => Ok(false),
            Err(other) => Err(other),
        }
    }

    /// Validates `value` against `schema` as if it were found at `path`.
    ///
    /// Assertions use this to check nested parts with their own schema while
    /// keeping the reported location accurate.
    pub fn validate_at(&self, value: &Value, schema: &Schema, path: &Path) -> Result<(), Error> {
        if let Some(max) = self.max_depth {
            if path.len() > max {
                return Err(self.fail(
                    value,
                    path,
                    format!("maximum nesting depth {} exceeded", max),
                    "max_depth_exceeded",
                ));
            }
        }
        trace!(path = %path, kind = schema.kind(), "validating");

        match schema {
            Schema::Literal(literal) => self.ensure(literal.matches(value), value, path, || {
                (format!("expected {} != {}", literal, value), "literal_mismatch")
            }),
            Schema::Type(tag) => self.ensure(tag.matches(value), value, path, || {
                (
                    format!("expected {} != {}", tag, value.type_name()),
                    "type_mismatch",
                )
            }),
            Schema::Pattern(regex) => {
                let matched = match value {
                    Value::Str(s) | Value::Symbol(s) => regex.is_match(s),
                    _ => false,
                };
                self.ensure(matched, value, path, || {
                    (
                        format!("expected /{}/ != {}", regex.as_str(), value),
                        "pattern_mismatch",
                    )
                })
            }
            Schema::Interval(interval) => {
                self.ensure(interval.contains(value), value, path, || {
                    (format!("expected {} != {}", interval, value), "out_of_range")
                })
            }
            Schema::Rules(rules) => self.check_rules(value, rules, path),
            Schema::Tuple(elements) => self.check_tuple(value, elements, path),
            Schema::Union(variants) => self.check_union(value, variants, path),
        }
    }

    fn ensure<F>(&self, ok: bool, value: &Value, path: &Path, describe: F) -> Result<(), Error>
    where
        F: FnOnce() -> (String, &'static str),
    {
        if ok {
            Ok(())
        } else {
            let (message, code) = describe();
            Err(self.fail(value, path, message, code))
        }
    }

    /// Builds a failure at `path`, attaching the caller hint for `value`.
    fn fail(&self, value: &Value, path: &Path, message: String, code: &str) -> Error {
        let error = ValidationError::new(path.clone(), message).with_code(code);
        let error = match &self.hint {
            None => error,
            Some(Hint::Static(hint)) => error.with_hint(hint.clone()),
            Some(Hint::Dynamic(hint)) => error.with_hint((**hint)(value)),
        };
        Error::Invalid(error)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("hint", &self.hint.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}
