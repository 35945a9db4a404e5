//! Inclusive intervals over orderable scalars.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::ops::RangeInclusive;

use crate::value::Value;

/// An inclusive interval `start..end`.
///
/// Membership uses [`Value::compare`], so integer intervals accept floats that
/// lie between the bounds and string intervals compare lexicographically.
/// Values that cannot be ordered against the bounds are never members.
///
/// # Example
///
/// ```rust
/// use conform::{Interval, Value};
///
/// let interval = Interval::from(1..=5);
/// assert!(interval.contains(&Value::Int(3)));
/// assert!(interval.contains(&Value::Float(4.5)));
/// assert!(!interval.contains(&Value::from("3")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: Value,
    pub end: Value,
}

impl Interval {
    pub fn new(start: impl Into<Value>, end: impl Into<Value>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        matches!(
            self.start.compare(value),
            Some(Ordering::Less | Ordering::Equal)
        ) && matches!(
            value.compare(&self.end),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// Returns true if an integer count lies within the interval.
    pub fn contains_len(&self, len: usize) -> bool {
        self.contains(&Value::from(len))
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl<T: Into<Value>> From<RangeInclusive<T>> for Interval {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Self::new(start, end)
    }
}
