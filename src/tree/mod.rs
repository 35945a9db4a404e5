//! Validation of element trees.
//!
//! A sibling of the value matcher for XML-shaped data: an [`Element`] has a
//! name, ordered attributes and child nodes, and a [`TreeSchema`] uses the
//! same diagnostic conventions as [`crate::Schema`] with rules that speak
//! about children, attributes and text.
//!
//! # Example
//!
//! ```rust
//! use conform::tree::{validate_tree, Element, Target, TreeRule, TreeSchema};
//!
//! let doc = Element::new("feed")
//!     .with_child(Element::new("entry").with_attribute("id", "1").with_text("first"))
//!     .with_child(Element::new("entry").with_attribute("id", "2").with_text("second"));
//!
//! let schema = TreeSchema::rules([TreeRule::exact([(
//!     "entry",
//!     TreeSchema::rules([
//!         TreeRule::size(1..=10),
//!         TreeRule::each(TreeSchema::rules([TreeRule::attr_req([(
//!             "id",
//!             TreeSchema::pattern(r"\A\d+\z").unwrap(),
//!         )])])),
//!     ]),
//! )])]);
//!
//! assert!(validate_tree(&Target::Element(&doc), &schema).is_ok());
//! ```

mod schema;
mod validate;

use std::fmt;

pub use schema::{TreeAssertion, TreeFields, TreeRule, TreeSchema};
pub use validate::{validate_tree, validate_tree_at};

/// A node of an element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// A named element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing the value of an existing one in place.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Direct child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// The concatenated text of every descendant text node, in document order.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Evaluates a relative path expression against this element.
    ///
    /// An expression is a `/`-separated list of steps, each an element name
    /// or `*`, optionally prefixed with `./`. Every step descends one level.
    ///
    /// ```rust
    /// use conform::tree::Element;
    ///
    /// let doc = Element::new("a")
    ///     .with_child(Element::new("b").with_child(Element::new("c")))
    ///     .with_child(Element::new("b").with_child(Element::new("d")));
    ///
    /// assert_eq!(doc.select("b").unwrap().len(), 2);
    /// assert_eq!(doc.select("./b/*").unwrap().len(), 2);
    /// assert!(doc.select("//b").is_err());
    /// ```
    pub fn select(&self, expr: &str) -> Result<Vec<&Element>, UnsupportedSelector> {
        let unsupported = || UnsupportedSelector(expr.to_string());
        let relative = expr.strip_prefix("./").unwrap_or(expr);
        if relative.is_empty() {
            return Err(unsupported());
        }

        let mut selection = vec![self];
        for step in relative.split('/') {
            if !is_step(step) {
                return Err(unsupported());
            }
            selection = selection
                .into_iter()
                .flat_map(Element::child_elements)
                .filter(|child| step == "*" || child.name == step)
                .collect();
        }
        Ok(selection)
    }
}

fn is_step(step: &str) -> bool {
    step == "*"
        || (!step.is_empty()
            && step
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
            && step != "."
            && step != "..")
}

/// A path expression [`Element::select`] cannot evaluate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported selector {0:?}")]
pub struct UnsupportedSelector(pub String);

/// What a tree schema is checked against.
#[derive(Debug, Clone, PartialEq)]
pub enum Target<'a> {
    /// A single element.
    Element(&'a Element),
    /// An ordered selection of elements.
    Nodes(Vec<&'a Element>),
    /// An attribute value, or `None` when the attribute is absent.
    Attribute(Option<&'a str>),
}

impl<'a> Target<'a> {
    /// The runtime kind, as written in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Target::Element(_) => "Element",
            Target::Nodes(_) => "NodeSet",
            Target::Attribute(Some(_)) => "String",
            Target::Attribute(None) => "NilClass",
        }
    }

    /// The printable text: the attribute value, the element's text, or the
    /// concatenated text of a selection. Absent attributes have none.
    pub fn text(&self) -> Option<String> {
        match self {
            Target::Element(element) => Some(element.text()),
            Target::Nodes(nodes) => Some(nodes.iter().map(|n| n.text()).collect()),
            Target::Attribute(value) => value.map(str::to_string),
        }
    }

    /// Child-element count, selection length or attribute length.
    pub fn len(&self) -> Option<usize> {
        match self {
            Target::Element(element) => Some(element.child_elements().count()),
            Target::Nodes(nodes) => Some(nodes.len()),
            Target::Attribute(value) => value.map(|v| v.chars().count()),
        }
    }

    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            Target::Element(element) => Some(*element),
            _ => None,
        }
    }
}

impl fmt::Display for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Element(element) => write!(f, "<{}>", element.name),
            Target::Nodes(nodes) => {
                f.write_str("[")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "<{}>", node.name)?;
                }
                f.write_str("]")
            }
            Target::Attribute(Some(value)) => write!(f, "{:?}", value),
            Target::Attribute(None) => f.write_str("nil"),
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Element>();
    assert_sync::<Element>();
    assert_send::<TreeSchema>();
    assert_sync::<TreeSchema>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Element {
        Element::new("root")
            .with_attribute("lang", "en")
            .with_text("a")
            .with_child(Element::new("item").with_text("b"))
            .with_child(Element::new("note").with_child(Element::new("item").with_text("c")))
    }

    #[test]
    fn test_text_concatenates_descendants() {
        assert_eq!(doc().text(), "abc");
    }

    #[test]
    fn test_with_attribute_replaces_in_place() {
        let element = Element::new("x").with_attribute("a", "1").with_attribute("b", "2").with_attribute("a", "3");
        assert_eq!(
            element.attributes(),
            &[("a".to_string(), "3".to_string()), ("b".to_string(), "2".to_string())]
        );
    }

    #[test]
    fn test_select_steps() {
        let doc = doc();
        assert_eq!(doc.select("item").unwrap().len(), 1);
        assert_eq!(doc.select("./*").unwrap().len(), 2);
        let nested = doc.select("note/item").unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].text(), "c");
        assert!(doc.select("missing").unwrap().is_empty());
    }

    #[test]
    fn test_select_rejects_unsupported_syntax() {
        let doc = doc();
        for expr in ["", "./", "//item", "item[1]", "../x", "@lang", "item/"] {
            assert_eq!(
                doc.select(expr).unwrap_err(),
                UnsupportedSelector(expr.to_string()),
                "{}",
                expr
            );
        }
    }

    #[test]
    fn test_target_len_and_text() {
        let doc = doc();
        assert_eq!(Target::Element(&doc).len(), Some(2));
        assert_eq!(Target::Attribute(Some("héllo")).len(), Some(5));
        assert_eq!(Target::Attribute(None).len(), None);
        assert_eq!(Target::Attribute(None).text(), None);
        let items = doc.select("*").unwrap();
        assert_eq!(Target::Nodes(items).text().as_deref(), Some("bc"));
    }

    #[test]
    fn test_target_display() {
        let doc = doc();
        assert_eq!(Target::Element(&doc).to_string(), "<root>");
        assert_eq!(Target::Nodes(doc.select("*").unwrap()).to_string(), "[<item>, <note>]");
        assert_eq!(Target::Attribute(Some("en")).to_string(), "\"en\"");
        assert_eq!(Target::Attribute(None).to_string(), "nil");
    }
}
