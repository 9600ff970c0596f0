//! Values visible to templates
//!
//! Templates never inspect host objects directly. Anything stored in a
//! [`Context`](crate::context::Context) is a [`Value`]; structured host data is
//! exposed through the [`PropertySource`] trait, which answers attribute reads
//! and zero-argument accessor calls by name.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Named, read-only access into a host object
pub trait PropertySource: fmt::Debug + Send + Sync {
    /// Runtime type name used in diagnostics
    fn type_name(&self) -> &str;

    /// Read the attribute `name`, `None` if there is no such attribute
    fn property(&self, name: &str) -> Option<Value>;

    /// Call the zero-argument accessor `name`, `None` if there is no such accessor
    fn invoke(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Elements in natural iteration order when the object is a collection
    fn elements(&self) -> Option<Vec<Value>> {
        None
    }

    /// Canonical string form used by text directives
    fn display(&self) -> String {
        format!("[{}]", self.type_name())
    }
}

/// A value stored in the context or produced by path resolution
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(Arc<dyn PropertySource>),
}

impl Value {
    /// Wrap a host object
    pub fn object<P: PropertySource + 'static>(source: P) -> Self {
        Value::Object(Arc::new(source))
    }

    /// Type name used in error messages
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Object(source) => source.type_name(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Read a named attribute
    pub fn property(&self, name: &str) -> Option<Value> {
        match self {
            Value::List(items) => match name {
                "length" | "size" => Some(Value::Int(items.len() as i64)),
                _ => None,
            },
            Value::Object(source) => source.property(name),
            _ => None,
        }
    }

    /// Call a named zero-argument accessor
    pub fn invoke(&self, name: &str) -> Option<Value> {
        match self {
            Value::List(items) => match name {
                "size" | "length" => Some(Value::Int(items.len() as i64)),
                _ => None,
            },
            Value::Object(source) => source.invoke(name),
            _ => None,
        }
    }

    /// Elements when the value is a list or a host collection
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::List(items) => Some(items.clone()),
            Value::Object(source) => source.elements(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(source) => f.write_str(&source.display()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            // host objects compare by identity
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                let mut record = Record::new("object");
                for (key, value) in map {
                    record.insert(key, Value::from(value));
                }
                Value::object(record)
            }
        }
    }
}

type Accessor = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Adapter exposing a domain type as named fields and accessors
///
/// ```
/// use attrplate::value::{Record, Value};
///
/// let student = Record::new("Student")
///     .field("id", 1)
///     .field("name", "Ivan")
///     .accessor("initial", |r| {
///         let name = r.get("name").and_then(|v| v.as_str().map(str::to_string));
///         Value::from(name.and_then(|n| n.chars().next()).map(String::from))
///     });
///
/// assert_eq!(student.get("name"), Some(&Value::from("Ivan")));
/// ```
#[derive(Clone)]
pub struct Record {
    type_name: String,
    fields: IndexMap<String, Value>,
    accessors: IndexMap<String, Accessor>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
            accessors: IndexMap::new(),
        }
    }

    /// Add a field, builder style
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a zero-argument accessor, builder style
    pub fn accessor<F>(mut self, name: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(accessor));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PropertySource for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.fields.get(name).cloned()
    }

    fn invoke(&self, name: &str) -> Option<Value> {
        self.accessors.get(name).map(|accessor| accessor(self))
    }

    fn display(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}{{{}}}", self.type_name, fields)
    }
}
