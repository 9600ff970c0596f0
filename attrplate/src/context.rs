use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

/// Root scope for every lookup made while rendering
///
/// The renderer borrows the context mutably: loop variables are bound into it
/// for the duration of an iteration and removed (or restored) afterwards, so a
/// render call always leaves the context as it found it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: HashMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a JSON object, one entry per top-level key
    pub fn from_json(json: serde_json::Value) -> Result<Self> {
        match json {
            serde_json::Value::Object(map) => Ok(Self {
                values: map
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            }),
            other => Err(Error::config(format!(
                "context must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Bind `name`, returning the previous value if there was one
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Open a shadow frame for `name`
    ///
    /// The returned guard dereferences to this context. Whatever `name` was
    /// bound to when the frame opened is put back when the guard drops, or the
    /// name is removed if it was unbound.
    pub fn shadow(&mut self, name: impl Into<String>) -> LoopBinding<'_> {
        let name = name.into();
        let previous = self.values.get(&name).cloned();
        LoopBinding {
            context: self,
            name,
            previous,
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Shadow frame guarding a temporarily rebound context entry
pub struct LoopBinding<'a> {
    context: &'a mut Context,
    name: String,
    previous: Option<Value>,
}

impl LoopBinding<'_> {
    /// Rebind the guarded name for the next iteration
    pub fn bind(&mut self, value: Value) {
        self.context.values.insert(self.name.clone(), value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deref for LoopBinding<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        self.context
    }
}

impl DerefMut for LoopBinding<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        self.context
    }
}

impl Drop for LoopBinding<'_> {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => {
                self.context.values.insert(std::mem::take(&mut self.name), value);
            }
            None => {
                self.context.values.remove(&self.name);
            }
        }
    }
}
