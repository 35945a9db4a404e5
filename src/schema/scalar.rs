//! Scalar schema shapes: literals and type tags.

use std::fmt::{self, Display};

use crate::value::Value;

/// A value that must be matched exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Nil,
    Bool(bool),
    Str(String),
    Symbol(String),
}

impl Literal {
    /// Creates a symbol literal.
    pub fn symbol(name: impl Into<String>) -> Self {
        Literal::Symbol(name.into())
    }

    /// Returns true if `value` equals this literal. Strings never equal
    /// symbols.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Literal::Nil, Value::Nil) => true,
            (Literal::Bool(a), Value::Bool(b)) => a == b,
            (Literal::Str(a), Value::Str(b)) => a == b,
            (Literal::Symbol(a), Value::Symbol(b)) => a == b,
            _ => false,
        }
    }

    /// The literal as a value.
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Symbol(s) => Value::Symbol(s.clone()),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

impl From<()> for Literal {
    fn from(_: ()) -> Self {
        Literal::Nil
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Bool(b)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Str(s)
    }
}

/// A runtime type a value must have.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Nil,
    Boolean,
    Integer,
    Float,
    /// Integers and floats.
    Numeric,
    String,
    Symbol,
    Array,
    Hash,
    /// Matches every value.
    Object,
    /// A host object whose [`crate::Object::type_name`] equals the name.
    Named(std::string::String),
}

impl TypeTag {
    /// Creates a tag for a user-defined host type.
    pub fn named(name: impl Into<std::string::String>) -> Self {
        TypeTag::Named(name.into())
    }

    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Object, _) => true,
            (TypeTag::Nil, Value::Nil) => true,
            (TypeTag::Boolean, Value::Bool(_)) => true,
            (TypeTag::Integer, Value::Int(_)) => true,
            (TypeTag::Float, Value::Float(_)) => true,
            (TypeTag::Numeric, Value::Int(_) | Value::Float(_)) => true,
            (TypeTag::String, Value::Str(_)) => true,
            (TypeTag::Symbol, Value::Symbol(_)) => true,
            (TypeTag::Array, Value::Seq(_)) => true,
            (TypeTag::Hash, Value::Map(_)) => true,
            (TypeTag::Named(name), Value::Object(object)) => object.type_name() == name,
            _ => false,
        }
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeTag::Nil => "NilClass",
            TypeTag::Boolean => "Boolean",
            TypeTag::Integer => "Integer",
            TypeTag::Float => "Float",
            TypeTag::Numeric => "Numeric",
            TypeTag::String => "String",
            TypeTag::Symbol => "Symbol",
            TypeTag::Array => "Array",
            TypeTag::Hash => "Hash",
            TypeTag::Object => "Object",
            TypeTag::Named(name) => name.as_str(),
        };
        write!(f, "{}", name)
    }
}
