//! The nested data model that schemas are matched against.
//!
//! [`Value`] covers the usual scalar and container shapes plus symbols and
//! opaque host objects. Mappings keep their insertion order, which matters for
//! rules such as `keys` and `each_key` that observe iteration order.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::Error;

/// A host object that can be inspected through named accessors.
///
/// The `method` rule calls [`Object::call`] with the accessor name and
/// validates whatever comes back. Returning `None` means the accessor does not
/// exist, which is reported as a hard error rather than a validation failure.
///
/// # Example
///
/// ```rust
/// use conform::{Object, Value};
///
/// #[derive(Debug)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// impl Object for Point {
///     fn type_name(&self) -> &str {
///         "Point"
///     }
///
///     fn call(&self, accessor: &str) -> Option<Value> {
///         match accessor {
///             "x" => Some(self.x.into()),
///             "y" => Some(self.y.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let point = Value::object(Point { x: 1, y: 2 });
/// assert_eq!(point.type_name(), "Point");
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// The runtime type name, matched by `TypeTag::Named`.
    fn type_name(&self) -> &str;

    /// Invokes a zero-argument accessor.
    fn call(&self, accessor: &str) -> Option<Value>;
}

/// A nested data value.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(String),
    Seq(Vec<Value>),
    Map(IndexMap<Value, Value>),
    Object(Arc<dyn Object>),
}

impl Value {
    /// Creates a symbol.
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    /// Creates a sequence from any iterator of convertible items.
    pub fn seq<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }

    /// Creates a mapping, preserving the iteration order of `entries`.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Wraps a host object.
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// The runtime type name used in diagnostics.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "NilClass",
            Value::Bool(true) => "TrueClass",
            Value::Bool(false) => "FalseClass",
            Value::Int(_) => "Integer",
            Value::Float(_) => "Float",
            Value::Str(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::Seq(_) => "Array",
            Value::Map(_) => "Hash",
            Value::Object(object) => object.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<Value, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Element count for sequences and mappings, character count for strings
    /// and symbols.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Seq(items) => Some(items.len()),
            Value::Map(map) => Some(map.len()),
            Value::Str(s) | Value::Symbol(s) => Some(s.chars().count()),
            _ => None,
        }
    }

    /// Compares two values when they are mutually orderable.
    ///
    /// Integers and floats compare numerically with each other; strings,
    /// symbols and sequences compare within their own kind. Everything else
    /// is unordered.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Str(a), Value::Str(b)) | (Value::Symbol(a), Value::Symbol(b)) => {
                Some(a.cmp(b))
            }
            (Value::Seq(a), Value::Seq(b)) => {
                for (x, y) in a.iter().zip(b) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        unequal => return Some(unequal),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }

    /// A total order for sorting heterogeneous keys.
    ///
    /// Values of different kinds are grouped by kind. Numbers order by value
    /// with floats under IEEE total ordering, so NaN sorts after every other
    /// number; an integer sorts before an equal float. Sequences and mappings
    /// compare element-wise, then by length. Host objects order by identity.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        let by_kind = self.kind_rank().cmp(&other.kind_rank());
        if by_kind != Ordering::Equal {
            return by_kind;
        }
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Int(a), Value::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (Value::Float(a), Value::Int(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
            (Value::Str(a), Value::Str(b)) | (Value::Symbol(a), Value::Symbol(b)) => a.cmp(b),
            (Value::Seq(a), Value::Seq(b)) => sort_cmp_all(a.iter(), b.iter()),
            (Value::Map(a), Value::Map(b)) => {
                sort_cmp_all(a.iter().flat_map(|(k, v)| [k, v]), b.iter().flat_map(|(k, v)| [k, v]))
            }
            (Value::Object(a), Value::Object(b)) => object_addr(a).cmp(&object_addr(b)),
            _ => Ordering::Equal,
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            Value::Nil => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::Symbol(_) => 4,
            Value::Seq(_) => 5,
            Value::Map(_) => 6,
            Value::Object(_) => 7,
        }
    }

    /// Invokes a zero-argument accessor by name.
    ///
    /// Host objects answer through [`Object::call`]; built-in values expose a
    /// small fixed set (`size`, `length`, `empty?`, `first`, `last`, `keys`,
    /// `values`, `class`, `to_s`, `inspect`).
    pub fn call(&self, accessor: &str) -> Result<Value, Error> {
        let result = match (self, accessor) {
            (Value::Object(object), name) => object.call(name),
            (_, "class") => Some(Value::Str(self.type_name().to_string())),
            (_, "inspect") => Some(Value::Str(self.to_string())),
            (Value::Str(s), "to_s") | (Value::Symbol(s), "to_s") => Some(Value::Str(s.clone())),
            (Value::Nil, "to_s") => Some(Value::Str(String::new())),
            (_, "to_s") => Some(Value::Str(self.to_string())),
            (Value::Seq(_) | Value::Map(_) | Value::Str(_) | Value::Symbol(_), "size" | "length") => {
                self.len().map(Value::from)
            }
            (Value::Seq(_) | Value::Map(_) | Value::Str(_) | Value::Symbol(_), "empty?") => {
                self.len().map(|n| Value::Bool(n == 0))
            }
            (Value::Seq(items), "first") => Some(items.first().cloned().unwrap_or(Value::Nil)),
            (Value::Seq(items), "last") => Some(items.last().cloned().unwrap_or(Value::Nil)),
            (Value::Map(map), "keys") => Some(Value::Seq(map.keys().cloned().collect())),
            (Value::Map(map), "values") => Some(Value::Seq(map.values().cloned().collect())),
            _ => None,
        };
        result.ok_or_else(|| Error::UndefinedAccessor {
            type_name: self.type_name().to_string(),
            name: accessor.to_string(),
        })
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Seq(a), Value::Seq(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => object_addr(a) == object_addr(b),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Nil => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::Symbol(s) => s.hash(state),
            Value::Seq(items) => items.hash(state),
            // mapping equality ignores order
            Value::Map(map) => map.len().hash(state),
            Value::Object(object) => object_addr(object).hash(state),
        }
    }
}

/// Lexicographic [`Value::sort_cmp`] over two element streams, shorter first on a tie.
fn sort_cmp_all<'a>(
    mut a: impl Iterator<Item = &'a Value>,
    mut b: impl Iterator<Item = &'a Value>,
) -> Ordering {
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => match x.sort_cmp(y) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
        }
    }
}

fn object_addr(object: &Arc<dyn Object>) -> usize {
    Arc::as_ptr(object) as *const () as usize
}

fn is_plain_symbol(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Renders the printable (inspect) form used in diagnostics.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Symbol(s) if is_plain_symbol(s) => write!(f, ":{}", s),
            Value::Symbol(s) => write!(f, ":{:?}", s),
            Value::Seq(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Object(object) => write!(f, "#<{}>", object.type_name()),
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::seq(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl From<IndexMap<Value, Value>> for Value {
    fn from(map: IndexMap<Value, Value>) -> Self {
        Value::Map(map)
    }
}

/// JSON objects become string-keyed mappings in document order.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::seq(items),
            serde_json::Value::Object(map) => Value::map(map),
        }
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Value>();
    assert_sync::<Value>();
};
