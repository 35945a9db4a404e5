//! # Conform
//!
//! Structural schema matching for nested values.
//!
//! A schema is built in memory out of the same vocabulary as the data it
//! describes: literals, runtime types, patterns, intervals, tuples, unions and
//! mappings of named rules. [`validate`] walks a value and a schema together
//! and reports the first violation with the path where it happened; a union
//! whose branches all fail reports every branch.
//!
//! ## Core Types
//!
//! - [`Value`]: the nested data being checked (scalars, symbols, sequences,
//!   ordered mappings, host objects)
//! - [`Schema`] and [`Rule`]: what a conforming value looks like
//! - [`Path`]: where in the value a failure happened (e.g. `[users, #0, name]`)
//! - [`ValidationError`] and [`Error`]: the failure, and hard errors that are
//!   not failures
//! - [`Validator`]: validation options (hints, depth limit)
//!
//! The `fixture` module (default feature `fixture`) goes the other way and
//! synthesizes a value that satisfies a schema. The [`tree`] module applies
//! the same conventions to element trees.
//!
//! ## Example
//!
//! ```rust
//! use conform::{validate, Rule, Schema, TypeTag, Value};
//!
//! let schema = Schema::rules([Rule::hash([
//!     ("a", Schema::of(TypeTag::Integer)),
//!     ("b", Schema::of(TypeTag::String)),
//! ])]);
//!
//! let ok = Value::map([("a", Value::Int(1)), ("b", Value::from("x"))]);
//! assert!(validate(&ok, &schema).is_ok());
//!
//! let bad = Value::map([("a", Value::Int(1)), ("b", Value::Int(2))]);
//! let err = validate(&bad, &schema).unwrap_err();
//! assert_eq!(err.to_string(), "expected String != Integer (at [b])");
//! ```

pub mod error;
pub mod path;
pub mod schema;
pub mod tree;
pub mod validator;
pub mod value;

#[cfg(feature = "fixture")]
pub mod fixture;

#[cfg(feature = "fixture")]
pub use error::FixtureError;
pub use error::{Error, ValidationError};
#[cfg(feature = "fixture")]
pub use fixture::fixture;
pub use path::{Path, PathSegment};
pub use schema::{Assertion, Fields, Interval, Literal, Rule, Schema, TypeTag};
pub use validator::Validator;
pub use value::{Object, Value};

/// Validates `value` against `schema` with default options.
///
/// Returns the first failure found; see [`Validator`] for hints and a depth
/// limit.
pub fn validate(value: &Value, schema: &Schema) -> Result<(), Error> {
    Validator::new().validate(value, schema)
}

/// Returns whether `value` conforms to `schema`.
///
/// Only validation failures map to `false`; hard errors such as an undefined
/// accessor are returned as `Err`.
pub fn is_valid(value: &Value, schema: &Schema) -> Result<bool, Error> {
    Validator::new().is_valid(value, schema)
}
