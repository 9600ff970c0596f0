//! Evaluation of the three directive attributes

use crate::config::RenderConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::markup::Element;
use crate::path::{self, Condition, Iteration};
use crate::resolver::{CollectionExtractor, PathResolver};
use crate::value::Value;

/// Conditional coercion of a resolved value
///
/// Null is false, booleans are themselves, numbers are true when strictly
/// positive, and any other value is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Int(n) => *n > 0,
        Value::Float(n) => *n > 0.0,
        Value::String(_) | Value::List(_) | Value::Object(_) => true,
    }
}

/// Evaluates conditional, iteration and text directives against a context
#[derive(Debug, Clone)]
pub struct DirectiveEvaluator {
    config: RenderConfig,
    resolver: PathResolver,
    extractor: CollectionExtractor,
}

impl Default for DirectiveEvaluator {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl DirectiveEvaluator {
    pub fn new(config: RenderConfig) -> Self {
        let syntax = config.path_syntax();
        Self {
            config,
            resolver: PathResolver::new(syntax),
            extractor: CollectionExtractor::new(syntax),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn parse_condition(&self, value: &str) -> Result<Condition> {
        path::parse_condition(value, self.config.path_syntax())
            .ok_or_else(|| Error::invalid_syntax(&self.config.conditional_attribute, value))
    }

    fn parse_iteration(&self, value: &str) -> Result<Iteration> {
        path::parse_iteration(value, self.config.path_syntax())
            .ok_or_else(|| Error::invalid_syntax(&self.config.iteration_attribute, value))
    }

    /// Evaluate a conditional attribute value
    ///
    /// `true`/`false` literals never touch the context. A path that cannot be
    /// resolved is an error, not a false condition.
    pub fn evaluate_conditional(&self, value: &str, context: &Context) -> Result<bool> {
        match self.parse_condition(value)? {
            Condition::Literal(literal) => Ok(literal),
            Condition::Path(path) => {
                let resolved = self.resolver.resolve_path(context, &path)?;
                Ok(is_truthy(&resolved))
            }
        }
    }

    /// Evaluate a text attribute value to its output string
    pub fn evaluate_text(&self, value: &str, context: &Context) -> Result<String> {
        let path = path::parse_interpolation(value, self.config.path_syntax())
            .ok_or_else(|| Error::invalid_syntax(&self.config.text_attribute, value))?;
        let resolved = self.resolver.resolve_path(context, &path)?;
        Ok(resolved.to_string())
    }

    /// Evaluate an iteration attribute value
    ///
    /// Returns the loop variable name and the elements to bind it to, in
    /// iteration order.
    pub fn evaluate_iteration(
        &self,
        value: &str,
        context: &Context,
    ) -> Result<(String, Vec<Value>)> {
        let iteration = self.parse_iteration(value)?;
        let items = self.extractor.extract_from_path(context, &iteration.source)?;
        Ok((iteration.variable, items))
    }

    /// Check the syntax of every directive on `element` without resolving anything
    pub fn check(&self, element: &Element) -> Result<()> {
        if let Some(value) = element.attr(&self.config.conditional_attribute) {
            self.parse_condition(value)?;
        }
        if let Some(value) = element.attr(&self.config.iteration_attribute) {
            self.parse_iteration(value)?;
        }
        if let Some(value) = element.attr(&self.config.text_attribute) {
            path::parse_interpolation(value, self.config.path_syntax())
                .ok_or_else(|| Error::invalid_syntax(&self.config.text_attribute, value))?;
        }
        Ok(())
    }
}
