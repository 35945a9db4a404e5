//! Tree schema definitions.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::Error;
use crate::path::Path;
use crate::schema::Interval;

use super::Target;

/// Sub-schemas keyed by child name, attribute name or selector.
pub type TreeFields = IndexMap<String, TreeSchema>;

type TreeAssertionFn = dyn Fn(&Target<'_>, &Path) -> Result<bool, Error> + Send + Sync;

/// A user-supplied predicate over a tree target.
///
/// Behaves like [`crate::Assertion`]: `Ok(false)` fails with "custom
/// assertion failed" and an [`Error::Invalid`] is re-raised at the
/// assertion's path.
#[derive(Clone)]
pub struct TreeAssertion(Arc<TreeAssertionFn>);

impl TreeAssertion {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Target<'_>, &Path) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Self(Arc::new(predicate))
    }

    pub fn check(&self, target: &Target<'_>, path: &Path) -> Result<bool, Error> {
        (*self.0)(target, path)
    }
}

impl fmt::Debug for TreeAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TreeAssertion(..)")
    }
}

/// A description of conforming tree targets.
#[derive(Debug, Clone)]
pub enum TreeSchema {
    /// The target's text must equal the string.
    Text(String),
    /// The target's text must match the pattern.
    Pattern(Regex),
    /// The target must satisfy every rule, checked in order.
    Rules(Vec<TreeRule>),
    /// The target must be a selection with one element per schema.
    Tuple(Vec<TreeSchema>),
    /// The target must satisfy at least one schema.
    Union(Vec<TreeSchema>),
}

impl TreeSchema {
    pub fn text(text: impl Into<String>) -> Self {
        TreeSchema::Text(text.into())
    }

    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(TreeSchema::Pattern(Regex::new(pattern)?))
    }

    pub fn rules(rules: impl IntoIterator<Item = TreeRule>) -> Self {
        TreeSchema::Rules(rules.into_iter().collect())
    }

    pub fn tuple(elements: impl IntoIterator<Item = TreeSchema>) -> Self {
        TreeSchema::Tuple(elements.into_iter().collect())
    }

    pub fn union(variants: impl IntoIterator<Item = TreeSchema>) -> Self {
        TreeSchema::Union(variants.into_iter().collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TreeSchema::Text(_) => "text",
            TreeSchema::Pattern(_) => "pattern",
            TreeSchema::Rules(_) => "rules",
            TreeSchema::Tuple(_) => "tuple",
            TreeSchema::Union(_) => "union",
        }
    }
}

impl From<&str> for TreeSchema {
    fn from(text: &str) -> Self {
        TreeSchema::text(text)
    }
}

impl From<Regex> for TreeSchema {
    fn from(regex: Regex) -> Self {
        TreeSchema::Pattern(regex)
    }
}

impl From<TreeRule> for TreeSchema {
    fn from(rule: TreeRule) -> Self {
        TreeSchema::Rules(vec![rule])
    }
}

/// One named constraint inside a tree schema.
#[derive(Debug, Clone)]
pub enum TreeRule {
    /// Selection length, child-element count or attribute length.
    Size(Interval),
    /// Exact text equality.
    Text(String),
    /// Every element of a selection.
    Each(TreeSchema),
    /// The distinct direct child names, in encounter order, are exactly
    /// these keys; each same-name group is validated as a selection.
    Exact(TreeFields),
    /// The selection of each expression is validated.
    Children(TreeFields),
    /// The attribute names, in order, are exactly these keys.
    AttrExact(TreeFields),
    /// Each attribute is validated, absent ones as a missing value.
    AttrReq(TreeFields),
    /// Each attribute is validated when present.
    AttrOpt(TreeFields),
    Assertions(Vec<TreeAssertion>),
}

impl TreeRule {
    pub fn size(interval: impl Into<Interval>) -> Self {
        TreeRule::Size(interval.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        TreeRule::Text(text.into())
    }

    pub fn each(schema: impl Into<TreeSchema>) -> Self {
        TreeRule::Each(schema.into())
    }

    pub fn exact<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<TreeSchema>,
    {
        TreeRule::Exact(collect_fields(fields))
    }

    pub fn children<I, K, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<TreeSchema>,
    {
        TreeRule::Children(collect_fields(selectors))
    }

    pub fn attr_exact<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<TreeSchema>,
    {
        TreeRule::AttrExact(collect_fields(fields))
    }

    pub fn attr_req<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<TreeSchema>,
    {
        TreeRule::AttrReq(collect_fields(fields))
    }

    pub fn attr_opt<I, K, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, S)>,
        K: Into<String>,
        S: Into<TreeSchema>,
    {
        TreeRule::AttrOpt(collect_fields(fields))
    }

    pub fn assertion<F>(predicate: F) -> Self
    where
        F: Fn(&Target<'_>, &Path) -> Result<bool, Error> + Send + Sync + 'static,
    {
        TreeRule::Assertions(vec![TreeAssertion::new(predicate)])
    }

    pub fn name(&self) -> &'static str {
        match self {
            TreeRule::Size(_) => "size",
            TreeRule::Text(_) => "text",
            TreeRule::Each(_) => "each",
            TreeRule::Exact(_) => "exact",
            TreeRule::Children(_) => "children",
            TreeRule::AttrExact(_) => "attr_exact",
            TreeRule::AttrReq(_) => "attr_req",
            TreeRule::AttrOpt(_) => "attr_opt",
            TreeRule::Assertions(_) => "assertions",
        }
    }
}

fn collect_fields<I, K, S>(fields: I) -> TreeFields
where
    I: IntoIterator<Item = (K, S)>,
    K: Into<String>,
    S: Into<TreeSchema>,
{
    fields
        .into_iter()
        .map(|(key, schema)| (key.into(), schema.into()))
        .collect()
}
