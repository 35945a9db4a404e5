//! Error types for validation and fixture generation.
//!
//! This module provides [`ValidationError`] for values that do not conform to
//! a schema, [`Error`] which separates those from hard failures, and
//! [`FixtureError`] for schemas the fixture generator cannot synthesize.

#[cfg(feature = "fixture")]
mod fixture_error;
mod validation_error;

#[cfg(feature = "fixture")]
pub use fixture_error::FixtureError;
pub use validation_error::{Error, ValidationError};
