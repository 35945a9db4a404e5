//! Tuple and union schemas.
//!
//! - tuple: a fixed-length sequence, element i checked against schema i
//! - union: at least one variant must match
//!
//! A union tries its variants in order against the same value. The first
//! success ends the check; otherwise every variant is attempted and all of
//! their errors are reported together.

use stillwater::prelude::*;
use tracing::debug;

use crate::error::{Error, ValidationError};
use crate::path::Path;
use crate::schema::Schema;
use crate::value::Value;

use super::Validator;

impl Validator {
    pub(super) fn check_tuple(&self, value: &Value, elements: &[Schema], path: &Path) -> Result<(), Error> {
        let items = self.expect_seq(value, path)?;
        self.ensure(items.len() == elements.len(), value, path, || {
            (
                format!(
                    "expected implicit size {} != {} for {}",
                    elements.len(),
                    items.len(),
                    value
                ),
                "size_mismatch",
            )
        })?;
        for (i, (item, schema)) in items.iter().zip(elements).enumerate() {
            self.validate_at(item, schema, &path.push_index(i))?;
        }
        Ok(())
    }

    pub(super) fn check_union(&self, value: &Value, variants: &[Schema], path: &Path) -> Result<(), Error> {
        let mut failures: Option<NonEmptyVec<ValidationError>> = None;

        for (i, variant) in variants.iter().enumerate() {
            match self.validate_at(value, variant, &path.push_variant(i)) {
                Ok(()) => return Ok(()),
                Err(Error::Invalid(error)) => {
                    let error = NonEmptyVec::singleton(error);
                    failures = Some(match failures {
                        None => error,
                        Some(so_far) => so_far.combine(error),
                    });
                }
                Err(other) => return Err(other),
            }
        }

        debug!(path = %path, variants = variants.len(), "no union variant matched");
        let error = match failures {
            Some(branches) => ValidationError::union(path.clone(), value, branches),
            None => ValidationError::new(
                path.clone(),
                format!("expected at least one of 0 rules to match the {}", value),
            )
            .with_code("union_none_matched"),
        };
        Err(error.into())
    }
}
