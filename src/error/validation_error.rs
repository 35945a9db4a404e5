//! Validation error types.
//!
//! [`ValidationError`] is the single failure kind produced when a value does
//! not match a schema. [`Error`] wraps it together with the hard failures that
//! must not be mistaken for "the value is invalid".

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::Path;

/// A value did not conform to a schema.
///
/// `ValidationError` captures:
/// - **path**: where in the value the failure occurred
/// - **message**: human-readable description of the failure
/// - **code**: machine-readable error code for programmatic handling
/// - **hint**: optional caller-supplied text appended to the message
/// - **branches**: for union failures, the error of every attempted branch
///
/// # Example
///
/// ```rust
/// use conform::{Path, ValidationError};
///
/// let error = ValidationError::new(Path::root().push_key("age"), "expected Integer != String")
///     .with_code("type_mismatch")
///     .with_hint("age must be numeric");
///
/// assert_eq!(
///     error.to_string(),
///     "expected Integer != String (at [age]) age must be numeric"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The path to the value that failed validation.
    pub path: Path,
    /// Human-readable error message.
    pub message: String,
    /// Machine-readable error code (e.g. `type_mismatch`).
    pub code: String,
    /// Caller-supplied context appended when rendering.
    pub hint: Option<String>,
    /// Errors of every union branch, present only on union failures.
    pub branches: Option<Box<NonEmptyVec<ValidationError>>>,
}

impl ValidationError {
    /// Creates a new error with the given path and message.
    ///
    /// The error code defaults to "validation_error".
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code: "validation_error".to_string(),
            hint: None,
            branches: None,
        }
    }

    /// Aggregates the failures of every branch of a union schema.
    ///
    /// The message embeds the number of branches tried and every branch's
    /// rendered error, indented beneath it. Branch paths stay inside that
    /// text; the aggregate itself does not render a location.
    pub fn union(path: Path, value: impl Display, branches: NonEmptyVec<ValidationError>) -> Self {
        let mut message = format!(
            "expected at least one of {} rules to match the {}, errors:",
            branches.len(),
            value
        );
        for branch in branches.iter() {
            for line in branch.to_string().lines() {
                message.push_str("\n  ");
                message.push_str(line);
            }
        }
        Self {
            path,
            message,
            code: "union_none_matched".to_string(),
            hint: None,
            branches: Some(Box::new(branches)),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the caller hint and returns self for chaining.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Returns true if this error aggregates union branches.
    pub fn is_union(&self) -> bool {
        self.branches.is_some()
    }

    /// Returns the branch errors of a union failure, or an empty iterator.
    pub fn branch_errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.branches.iter().flat_map(|branches| branches.iter())
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.is_union() && !self.path.is_root() {
            write!(f, " (at {})", self.path)?;
        }
        if let Some(ref hint) = self.hint {
            write!(f, " {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Everything that can go wrong while validating.
///
/// Only [`Error::Invalid`] means "the value does not match". The other
/// variants are hard failures caused by the schema or the host objects and are
/// never swallowed by union branches or by [`crate::is_valid`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("undefined accessor `{name}` for {type_name}")]
    UndefinedAccessor { type_name: String, name: String },
}

impl Error {
    /// Returns the validation failure, if this is one.
    pub fn as_invalid(&self) -> Option<&ValidationError> {
        match self {
            Error::Invalid(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if this is a validation failure rather than a hard error.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Error::Invalid(_))
    }
}

// ValidationError and Error only hold owned data, so they can cross threads.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
    assert_send::<Error>();
    assert_sync::<Error>();
};
