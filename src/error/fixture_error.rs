//! Fixture generation errors.

use crate::schema::TypeTag;

/// A schema falls outside the subset the fixture generator can synthesize.
///
/// Generation fails fast instead of guessing: every variant names the part of
/// the schema that could not be turned into a value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FixtureError {
    #[error("unsupported fixture rules {0:?}")]
    UnsupportedRules(Vec<&'static str>),

    #[error("unsupported fixture type {0}")]
    UnsupportedType(TypeTag),

    #[error("unsupported fixture schema {0}")]
    UnsupportedSchema(String),

    #[error("cannot pick a variant of an empty union")]
    EmptyUnion,

    #[error("cannot draw from interval {0}")]
    EmptyInterval(String),

    #[error("cannot generate an example for /{pattern}/: {reason}")]
    Pattern { pattern: String, reason: String },
}
