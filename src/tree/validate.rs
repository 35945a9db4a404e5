//! The tree matcher.
//!
//! Walks a [`Target`] and a [`TreeSchema`] together the way the value matcher
//! walks a value: failures short-circuit, paths are threaded explicitly, and
//! a union is the only place errors are collected.

use stillwater::prelude::*;
use tracing::{debug, trace};

use crate::error::{Error, ValidationError};
use crate::path::{Path, PathSegment};

use super::schema::{TreeAssertion, TreeFields, TreeRule, TreeSchema};
use super::{Element, Target};

/// Validates `target` against `schema` from the root.
pub fn validate_tree(target: &Target<'_>, schema: &TreeSchema) -> Result<(), Error> {
    validate_tree_at(target, schema, &Path::root())
}

/// Validates `target` against `schema` as if it were found at `path`.
pub fn validate_tree_at(target: &Target<'_>, schema: &TreeSchema, path: &Path) -> Result<(), Error> {
    trace!(path = %path, kind = schema.kind(), "validating tree");
    match schema {
        TreeSchema::Text(text) => ensure(target.text().as_deref() == Some(text.as_str()), path, || {
            (format!("expected {:?} != {}", text, target), "literal_mismatch")
        }),
        TreeSchema::Pattern(regex) => {
            let matched = target.text().is_some_and(|text| regex.is_match(&text));
            ensure(matched, path, || {
                (
                    format!("expected /{}/ != {}", regex.as_str(), target),
                    "pattern_mismatch",
                )
            })
        }
        TreeSchema::Rules(rules) => check_rules(target, rules, path),
        TreeSchema::Tuple(elements) => check_tuple(target, elements, path),
        TreeSchema::Union(variants) => check_union(target, variants, path),
    }
}

fn check_rules(target: &Target<'_>, rules: &[TreeRule], path: &Path) -> Result<(), Error> {
    for rule in rules {
        trace!(path = %path, rule = rule.name(), "checking tree rule");
        match rule {
            TreeRule::Size(interval) => {
                let len = target.len();
                ensure(len.is_some_and(|n| interval.contains_len(n)), path, || {
                    let actual = len.map_or_else(|| target.to_string(), |n| n.to_string());
                    (
                        format!("expected explicit size {} != {}", interval, actual),
                        "size_mismatch",
                    )
                })?;
            }
            TreeRule::Text(text) => {
                let actual = target.text();
                ensure(actual.as_deref() == Some(text.as_str()), path, || {
                    let actual = actual.as_ref().map_or_else(|| "nil".to_string(), |t| format!("{:?}", t));
                    (format!("expected text {:?} != {}", text, actual), "text_mismatch")
                })?;
            }
            TreeRule::Each(schema) => match target {
                Target::Nodes(nodes) => {
                    for (i, node) in nodes.iter().enumerate() {
                        validate_tree_at(&Target::Element(node), schema, &path.push_index(i))?;
                    }
                }
                other => {
                    return Err(fail(
                        path,
                        format!("expected iterable != {}", other.type_name()),
                        "not_iterable",
                    ))
                }
            },
            TreeRule::Exact(fields) => check_exact(expect_element(target, path)?, fields, path)?,
            TreeRule::Children(selectors) => {
                let element = expect_element(target, path)?;
                for (expr, schema) in selectors {
                    let at = path.push(PathSegment::Select(expr.clone()));
                    let selection = element
                        .select(expr)
                        .map_err(|e| fail(&at, e.to_string(), "unsupported_selector"))?;
                    validate_tree_at(&Target::Nodes(selection), schema, &at)?;
                }
            }
            TreeRule::AttrExact(fields) => {
                let element = expect_element(target, path)?;
                let names: Vec<&str> = element.attributes().iter().map(|(n, _)| n.as_str()).collect();
                let expected: Vec<&str> = fields.keys().map(String::as_str).collect();
                ensure(names == expected, path, || {
                    (
                        format!("expected implicit attributes {:?} != {:?}", expected, names),
                        "attributes_mismatch",
                    )
                })?;
                check_attributes(element, fields, path, false)?;
            }
            TreeRule::AttrReq(fields) => {
                check_attributes(expect_element(target, path)?, fields, path, false)?
            }
            TreeRule::AttrOpt(fields) => {
                check_attributes(expect_element(target, path)?, fields, path, true)?
            }
            TreeRule::Assertions(assertions) => check_assertions(target, assertions, path)?,
        }
    }
    Ok(())
}

fn check_exact(element: &Element, fields: &TreeFields, path: &Path) -> Result<(), Error> {
    let mut names: Vec<&str> = Vec::new();
    for child in element.child_elements() {
        if !names.contains(&child.name()) {
            names.push(child.name());
        }
    }
    let expected: Vec<&str> = fields.keys().map(String::as_str).collect();
    ensure(names == expected, path, || {
        (
            format!("expected implicit children {:?} != {:?}", expected, names),
            "children_mismatch",
        )
    })?;

    for (name, schema) in fields {
        let group: Vec<&Element> = element.child_elements().filter(|c| c.name() == name).collect();
        validate_tree_at(&Target::Nodes(group), schema, &path.push_key(name.as_str()))?;
    }
    Ok(())
}

fn check_attributes(element: &Element, fields: &TreeFields, path: &Path, optional: bool) -> Result<(), Error> {
    for (name, schema) in fields {
        let value = element.attribute(name);
        if optional && value.is_none() {
            continue;
        }
        validate_tree_at(&Target::Attribute(value), schema, &path.push_key(name.as_str()))?;
    }
    Ok(())
}

fn check_assertions(target: &Target<'_>, assertions: &[TreeAssertion], path: &Path) -> Result<(), Error> {
    for (i, assertion) in assertions.iter().enumerate() {
        let at = path.push(PathSegment::Assertion(i));
        match assertion.check(target, &at) {
            Ok(true) => {}
            Ok(false) => return Err(fail(&at, "custom assertion failed".to_string(), "assertion_failed")),
            Err(Error::Invalid(inner)) => return Err(fail(&at, inner.to_string(), "assertion_failed")),
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

fn check_tuple(target: &Target<'_>, elements: &[TreeSchema], path: &Path) -> Result<(), Error> {
    let nodes = match target {
        Target::Nodes(nodes) => nodes,
        other => {
            return Err(fail(
                path,
                format!("expected NodeSet != {}", other.type_name()),
                "invalid_type",
            ))
        }
    };
    ensure(nodes.len() == elements.len(), path, || {
        (
            format!(
                "expected implicit size {} != {} for {}",
                elements.len(),
                nodes.len(),
                target
            ),
            "size_mismatch",
        )
    })?;
    for (i, (node, schema)) in nodes.iter().zip(elements).enumerate() {
        validate_tree_at(&Target::Element(node), schema, &path.push_index(i))?;
    }
    Ok(())
}

fn check_union(target: &Target<'_>, variants: &[TreeSchema], path: &Path) -> Result<(), Error> {
    let mut failures: Option<NonEmptyVec<ValidationError>> = None;

    for (i, variant) in variants.iter().enumerate() {
        match validate_tree_at(target, variant, &path.push_variant(i)) {
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

    debug!(path = %path, variants = variants.len(), "no tree union variant matched");
    let error = match failures {
        Some(branches) => ValidationError::union(path.clone(), target, branches),
        None => ValidationError::new(
            path.clone(),
            format!("expected at least one of 0 rules to match the {}", target),
        )
        .with_code("union_none_matched"),
    };
    Err(error.into())
}

fn expect_element<'a>(target: &Target<'a>, path: &Path) -> Result<&'a Element, Error> {
    target.as_element().ok_or_else(|| {
        fail(
            path,
            format!("expected Element != {}", target.type_name()),
            "invalid_type",
        )
    })
}

fn ensure<F>(ok: bool, path: &Path, describe: F) -> Result<(), Error>
where
    F: FnOnce() -> (String, &'static str),
{
    if ok {
        Ok(())
    } else {
        let (message, code) = describe();
        Err(fail(path, message, code))
    }
}

fn fail(path: &Path, message: String, code: &str) -> Error {
    Error::Invalid(ValidationError::new(path.clone(), message).with_code(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Element {
        Element::new("order")
            .with_attribute("id", "17")
            .with_attribute("currency", "EUR")
            .with_child(Element::new("line").with_attribute("sku", "A-1").with_text("2"))
            .with_child(Element::new("line").with_attribute("sku", "B-2").with_text("5"))
            .with_child(Element::new("total").with_text("7"))
    }

    fn check(doc: &Element, schema: TreeSchema) -> Result<(), Error> {
        validate_tree(&Target::Element(doc), &schema)
    }

    fn code(result: Result<(), Error>) -> String {
        result.unwrap_err().as_invalid().unwrap().code.clone()
    }

    #[test]
    fn test_exact_requires_distinct_names_in_order() {
        let doc = doc();
        let ok = TreeSchema::rules([TreeRule::exact([
            ("line", TreeSchema::rules([TreeRule::size(2..=2)])),
            ("total", TreeSchema::text("7")),
        ])]);
        assert!(check(&doc, ok).is_ok());

        let swapped = TreeSchema::rules([TreeRule::exact([
            ("total", TreeSchema::text("7")),
            ("line", TreeSchema::rules([TreeRule::size(2..=2)])),
        ])]);
        let err = check(&doc, swapped).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"expected implicit children ["total", "line"] != ["line", "total"]"#
        );
    }

    #[test]
    fn test_exact_group_path() {
        let schema = TreeSchema::rules([TreeRule::exact([
            ("line", TreeSchema::rules([TreeRule::size(3..=3)])),
            ("total", TreeSchema::text("7")),
        ])]);
        let err = check(&doc(), schema).unwrap_err();
        assert_eq!(err.to_string(), "expected explicit size 3..3 != 2 (at [line])");
    }

    #[test]
    fn test_children_each_and_attributes() {
        let schema = TreeSchema::rules([TreeRule::children([(
            "line",
            TreeSchema::rules([TreeRule::each(TreeSchema::rules([
                TreeRule::attr_req([("sku", TreeSchema::pattern(r"\A[A-Z]-\d\z").unwrap())]),
                TreeRule::text("2"),
            ]))]),
        )])]);
        let err = check(&doc(), schema).unwrap_err();
        assert_eq!(err.to_string(), r#"expected text "2" != "5" (at [line, #1])"#);
    }

    #[test]
    fn test_attr_exact_order_matters() {
        let doc = doc();
        let schema = TreeSchema::rules([TreeRule::attr_exact([
            ("id", TreeSchema::pattern(r"\A\d+\z").unwrap()),
            ("currency", TreeSchema::text("EUR")),
        ])]);
        assert!(check(&doc, schema).is_ok());

        let schema = TreeSchema::rules([TreeRule::attr_exact([("id", TreeSchema::text("17"))])]);
        assert_eq!(code(check(&doc, schema)), "attributes_mismatch");
    }

    #[test]
    fn test_missing_attribute_required_vs_optional() {
        let doc = doc();
        let required = TreeSchema::rules([TreeRule::attr_req([("note", TreeSchema::text(""))])]);
        let err = check(&doc, required).unwrap_err();
        assert_eq!(err.to_string(), r#"expected "" != nil (at [note])"#);

        let optional = TreeSchema::rules([TreeRule::attr_opt([("note", TreeSchema::text(""))])]);
        assert!(check(&doc, optional).is_ok());
    }

    #[test]
    fn test_each_on_element_is_not_iterable() {
        let schema = TreeSchema::rules([TreeRule::each(TreeSchema::text(""))]);
        let err = check(&doc(), schema).unwrap_err();
        assert_eq!(err.to_string(), "expected iterable != Element");
    }

    #[test]
    fn test_unsupported_selector() {
        let schema = TreeSchema::rules([TreeRule::children([("//line", TreeSchema::rules([]))])]);
        let err = check(&doc(), schema).unwrap_err();
        assert_eq!(err.as_invalid().unwrap().code, "unsupported_selector");
        assert_eq!(err.to_string(), r#"unsupported selector "//line" (at [//line])"#);
    }

    #[test]
    fn test_tuple_over_selection() {
        let doc = doc();
        let lines = doc.select("line").unwrap();
        let schema = TreeSchema::tuple([TreeSchema::text("2"), TreeSchema::text("5")]);
        assert!(validate_tree(&Target::Nodes(lines.clone()), &schema).is_ok());

        let schema = TreeSchema::tuple([TreeSchema::text("2")]);
        let err = validate_tree(&Target::Nodes(lines), &schema).unwrap_err();
        assert_eq!(err.to_string(), "expected implicit size 1 != 2 for [<line>, <line>]");
    }

    #[test]
    fn test_union_collects_branches() {
        let schema = TreeSchema::union([TreeSchema::text("x"), TreeSchema::pattern(r"\A\d\z").unwrap()]);
        let doc = doc();
        let total = doc.select("total").unwrap();
        assert!(validate_tree(&Target::Element(total[0]), &schema).is_ok());

        let err = validate_tree(&Target::Attribute(Some("EUR")), &schema).unwrap_err();
        let error = err.as_invalid().unwrap();
        assert_eq!(error.branch_errors().count(), 2);
        assert!(error
            .message
            .starts_with("expected at least one of 2 rules to match the \"EUR\", errors:"));
    }

    #[test]
    fn test_assertion_receives_target() {
        let schema = TreeSchema::rules([TreeRule::assertion(|target, _| {
            Ok(target.as_element().is_some_and(|e| e.name() == "order"))
        })]);
        assert!(check(&doc(), schema).is_ok());

        let schema = TreeSchema::rules([TreeRule::assertion(|_, _| Ok(false))]);
        let err = check(&doc(), schema).unwrap_err();
        assert_eq!(err.to_string(), "custom assertion failed (at [assertion#0])");
    }
}
