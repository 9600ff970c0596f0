//! Property-path resolution against a [`Context`]

use crate::context::Context;
use crate::error::{Error, Result};
use crate::path::{self, PathSyntax, PropertyPath, Segment};
use crate::value::Value;

/// Resolves `${name.segment...}` references to values
#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver {
    syntax: PathSyntax,
}

impl PathResolver {
    pub fn new(syntax: PathSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> PathSyntax {
        self.syntax
    }

    /// Parse `expression` as a single interpolation and resolve it
    pub fn resolve(&self, context: &Context, expression: &str) -> Result<Value> {
        let path = path::parse_interpolation(expression, self.syntax)
            .ok_or_else(|| Error::invalid_syntax("path", expression))?;
        self.resolve_path(context, &path)
    }

    /// Resolve an already parsed path
    ///
    /// The root name must be bound in `context`; each following segment reads
    /// an attribute (or calls an accessor) on the value before it. The final
    /// value is returned as is.
    pub fn resolve_path(&self, context: &Context, path: &PropertyPath) -> Result<Value> {
        let mut current = context
            .get(&path.root)
            .cloned()
            .ok_or_else(|| Error::unbound(&path.root, path.to_string()))?;

        for segment in &path.segments {
            current = step(&current, segment)?;
        }

        log::trace!("resolved {} to a {}", path, current.type_name());
        Ok(current)
    }
}

fn step(current: &Value, segment: &Segment) -> Result<Value> {
    match segment {
        Segment::Property(name) => current
            .property(name)
            .ok_or_else(|| Error::no_such_property(name, current.type_name())),
        Segment::Call(name) => current
            .invoke(name)
            .ok_or_else(|| Error::no_such_property(format!("{}()", name), current.type_name())),
    }
}

/// Resolves iteration sources to element sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionExtractor {
    resolver: PathResolver,
}

impl CollectionExtractor {
    pub fn new(syntax: PathSyntax) -> Self {
        Self {
            resolver: PathResolver::new(syntax),
        }
    }

    /// Parse an iteration expression (`item: ${items}`) and return the
    /// elements of its source collection
    pub fn extract_collection(&self, context: &Context, expression: &str) -> Result<Vec<Value>> {
        let iteration = path::parse_iteration(expression, self.resolver.syntax())
            .ok_or_else(|| Error::invalid_syntax("iteration", expression))?;
        self.extract_from_path(context, &iteration.source)
    }

    /// Resolve `path` and require a list or collection
    ///
    /// Elements come back in the collection's own iteration order.
    pub fn extract_from_path(&self, context: &Context, path: &PropertyPath) -> Result<Vec<Value>> {
        let value = self.resolver.resolve_path(context, path)?;
        value
            .elements()
            .ok_or_else(|| Error::not_iterable(value.type_name(), path.to_string()))
    }
}
