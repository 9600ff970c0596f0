//! Error context and chaining utilities
//!
//! Lets callers wrap a failure with what they were doing (loading a
//! template file, validating an element) while keeping the original kind
//! reachable through [`Error::root_cause`].

use super::Error;
use std::fmt;

/// Attach a message to the error side of a `Result`
pub trait ErrorContext<T> {
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<String>;

    /// Like [`context`](ErrorContext::context), building the message only on failure
    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: Into<Error>,
{
    fn context<C>(self, context: C) -> Result<T, Error>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, Error>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

/// Layers of an error, outermost context first, root cause last
pub struct ErrorChain<'a> {
    error: &'a Error,
    layers: Vec<&'a Error>,
}

impl<'a> ErrorChain<'a> {
    pub fn new(error: &'a Error) -> Self {
        let mut layers = vec![error];
        let mut current = error;
        while let Error::WithContext { source, .. } = current {
            current = source;
            layers.push(current);
        }
        Self { error, layers }
    }

    /// Number of layers including the root cause
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Context messages from outermost to innermost, root cause excluded
    pub fn messages(&self) -> impl Iterator<Item = &str> + '_ {
        self.layers.iter().filter_map(|layer| match layer {
            Error::WithContext { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }

    pub fn root_cause(&self) -> &'a Error {
        self.error.root_cause()
    }

    /// Single-line form: `outer: inner: root cause`
    pub fn format_for_log(&self) -> String {
        let mut parts: Vec<String> = self.messages().map(str::to_string).collect();
        parts.push(self.root_cause().to_string());
        parts.join(": ")
    }
}

impl fmt::Display for ErrorChain<'_> {
    /// Root cause first, then each context message indented below it
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root_cause())?;
        for message in self.messages() {
            write!(f, "\n  {}", message)?;
        }
        Ok(())
    }
}
