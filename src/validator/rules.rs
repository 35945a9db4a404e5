//! Mapping schema rules.

use indexmap::IndexMap;
use tracing::trace;

use crate::error::Error;
use crate::path::{Path, PathSegment};
use crate::schema::{Assertion, Fields, Rule, Schema};
use crate::value::Value;

use super::Validator;

impl Validator {
    /// Checks every rule of a mapping schema, in order.
    ///
    /// Shape preconditions implied by the rule set run first, so a `keys`
    /// rule against a sequence fails before any other rule is looked at.
    pub(super) fn check_rules(&self, value: &Value, rules: &[Rule], path: &Path) -> Result<(), Error> {
        if rules.iter().any(Rule::implies_mapping) {
            self.expect_map(value, path)?;
        }
        if rules.iter().any(Rule::implies_sequence) {
            self.expect_seq(value, path)?;
        }

        let optional: Vec<&Value> = rules
            .iter()
            .filter_map(|rule| match rule {
                Rule::HashOpt(fields) => Some(fields.keys()),
                _ => None,
            })
            .flatten()
            .collect();

        for rule in rules {
            trace!(path = %path, rule = rule.name(), "checking rule");
            match rule {
                Rule::Size(interval) => {
                    let len = self.expect_seq(value, path)?.len();
                    self.ensure(interval.contains_len(len), value, path, || {
                        (
                            format!("expected explicit size {} != {}", interval, len),
                            "size_mismatch",
                        )
                    })?;
                }
                Rule::Keys(schema) => {
                    let keys = self.expect_map(value, path)?.keys().cloned().collect();
                    self.validate_at(&Value::Seq(keys), schema, &path.push(PathSegment::Rule("keys")))?;
                }
                Rule::Values(schema) => {
                    let values = self.expect_map(value, path)?.values().cloned().collect();
                    self.validate_at(
                        &Value::Seq(values),
                        schema,
                        &path.push(PathSegment::Rule("values")),
                    )?;
                }
                Rule::KeysSorted(schema) => {
                    let keys = sorted_keys(self.expect_map(value, path)?);
                    self.validate_at(
                        &Value::Seq(keys),
                        schema,
                        &path.push(PathSegment::Rule("keys_sorted")),
                    )?;
                }
                Rule::HashOpt(fields) => {
                    let map = self.expect_map(value, path)?;
                    for (key, schema) in fields {
                        if let Some(field) = map.get(key) {
                            self.validate_at(field, schema, &path.push_key(key.clone()))?;
                        }
                    }
                }
                Rule::HashReq(fields) => {
                    let map = self.expect_map(value, path)?;
                    let missing: Vec<Value> = fields
                        .keys()
                        .filter(|key| !map.contains_key(*key))
                        .cloned()
                        .collect();
                    if !missing.is_empty() {
                        return Err(self.fail(
                            value,
                            path,
                            format!(
                                "expected required keys {} ∉ {} (missing {})",
                                Value::Seq(sorted_keys(fields)),
                                Value::Seq(sorted_keys(map)),
                                Value::Seq(missing)
                            ),
                            "missing_keys",
                        ));
                    }
                    self.check_fields(map, fields, path)?;
                }
                Rule::Hash(fields) => {
                    let map = self.expect_map(value, path)?;
                    let expected = sorted_keys(fields);
                    let actual: Vec<Value> = sorted_keys(map)
                        .into_iter()
                        .filter(|key| !optional.contains(&key))
                        .collect();
                    if expected != actual {
                        return Err(self.fail(
                            value,
                            path,
                            format!(
                                "expected implicit keys {} != {}",
                                Value::Seq(expected),
                                Value::Seq(actual)
                            ),
                            "key_mismatch",
                        ));
                    }
                    self.check_fields(map, fields, path)?;
                }
                Rule::EachKey(schema) => {
                    for (i, key) in self.expect_map(value, path)?.keys().enumerate() {
                        self.validate_at(key, schema, &path.push(PathSegment::KeyAt(i)))?;
                    }
                }
                Rule::EachValue(schema) => {
                    for (i, item) in self.expect_map(value, path)?.values().enumerate() {
                        self.validate_at(item, schema, &path.push(PathSegment::ValueAt(i)))?;
                    }
                }
                Rule::Each(schema) => self.check_each(value, schema, path)?,
                Rule::Method(accessors) => {
                    for (name, schema) in accessors {
                        let result = value.call(name)?;
                        self.validate_at(&result, schema, &path.push(PathSegment::Method(name.clone())))?;
                    }
                }
                Rule::Assertions(assertions) => self.check_assertions(value, assertions, path)?,
            }
        }
        Ok(())
    }

    /// Validates every field of a `hash`/`hash_req` rule; presence has
    /// already been established.
    fn check_fields(&self, map: &IndexMap<Value, Value>, fields: &Fields, path: &Path) -> Result<(), Error> {
        for (key, schema) in fields {
            let at = path.push_key(key.clone());
            match map.get(key) {
                Some(field) => self.validate_at(field, schema, &at)?,
                None => self.validate_at(&Value::Nil, schema, &at)?,
            }
        }
        Ok(())
    }

    fn check_each(&self, value: &Value, schema: &Schema, path: &Path) -> Result<(), Error> {
        match value {
            Value::Seq(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.validate_at(item, schema, &path.push_index(i))?;
                }
                Ok(())
            }
            Value::Map(map) => {
                for (i, (k, v)) in map.iter().enumerate() {
                    let pair = Value::Seq(vec![k.clone(), v.clone()]);
                    self.validate_at(&pair, schema, &path.push_index(i))?;
                }
                Ok(())
            }
            other => Err(self.fail(
                value,
                path,
                format!("expected iterable != {}", other.type_name()),
                "not_iterable",
            )),
        }
    }

    fn check_assertions(&self, value: &Value, assertions: &[Assertion], path: &Path) -> Result<(), Error> {
        for (i, assertion) in assertions.iter().enumerate() {
            let at = path.push(PathSegment::Assertion(i));
            match assertion.check(value, &at) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(self.fail(
                        value,
                        &at,
                        "custom assertion failed".to_string(),
                        "assertion_failed",
                    ))
                }
                Err(Error::Invalid(inner)) => {
                    return Err(self.fail(value, &at, inner.to_string(), "assertion_failed"))
                }
                Err(other) => return Err(other),
            }
        }
        Ok(())
    }

    pub(super) fn expect_map<'v>(&self, value: &'v Value, path: &Path) -> Result<&'v IndexMap<Value, Value>, Error> {
        value.as_map().ok_or_else(|| {
            self.fail(
                value,
                path,
                format!("expected Hash != {}", value.type_name()),
                "invalid_type",
            )
        })
    }

    pub(super) fn expect_seq<'v>(&self, value: &'v Value, path: &Path) -> Result<&'v [Value], Error> {
        value.as_seq().ok_or_else(|| {
            self.fail(
                value,
                path,
                format!("expected Array != {}", value.type_name()),
                "invalid_type",
            )
        })
    }
}

fn sorted_keys<V>(map: &IndexMap<Value, V>) -> Vec<Value> {
    let mut keys: Vec<Value> = map.keys().cloned().collect();
    keys.sort_by(Value::sort_cmp);
    keys
}
