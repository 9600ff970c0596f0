use thiserror::Error;

pub mod context;

pub type Result<T> = std::result::Result<T, Error>;

// Re-export context helpers
pub use context::{ErrorChain, ErrorContext};

/// Main error type for attrplate
#[derive(Error, Debug)]
pub enum Error {
    /// A directive attribute value does not match its grammar
    #[error("Invalid directive syntax in `{attribute}`: {value:?}")]
    InvalidDirectiveSyntax { attribute: String, value: String },

    /// A root name referenced by an expression is absent from the context
    #[error("Unbound variable `{name}` in expression {expression:?}")]
    UnboundVariable { name: String, expression: String },

    /// A path segment does not exist on the resolved object
    #[error("No property `{segment}` on value of type `{type_name}`")]
    NoSuchProperty { segment: String, type_name: String },

    /// An iteration source resolved to something that cannot be iterated
    #[error("Value of type `{type_name}` is not iterable (expression {expression:?})")]
    NotIterable {
        type_name: String,
        expression: String,
    },

    #[error("Parse error at {line}:{column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // Error with context chain
    #[error("{message}")]
    WithContext {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn invalid_syntax(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidDirectiveSyntax {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn unbound(name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::UnboundVariable {
            name: name.into(),
            expression: expression.into(),
        }
    }

    pub fn no_such_property(segment: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::NoSuchProperty {
            segment: segment.into(),
            type_name: type_name.into(),
        }
    }

    pub fn not_iterable(type_name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::NotIterable {
            type_name: type_name.into(),
            expression: expression.into(),
        }
    }

    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    // Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            message: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any context wrappers
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::WithContext { source, .. } = current {
            current = source;
        }
        current
    }

    /// Whether the error was raised while evaluating a directive against a context
    pub fn is_render_error(&self) -> bool {
        matches!(
            self.root_cause(),
            Error::InvalidDirectiveSyntax { .. }
                | Error::UnboundVariable { .. }
                | Error::NoSuchProperty { .. }
                | Error::NotIterable { .. }
        )
    }

    /// Get a stable error code, e.g. for CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidDirectiveSyntax { .. } => "E_DIRECTIVE_SYNTAX",
            Error::UnboundVariable { .. } => "E_UNBOUND_VARIABLE",
            Error::NoSuchProperty { .. } => "E_NO_SUCH_PROPERTY",
            Error::NotIterable { .. } => "E_NOT_ITERABLE",
            Error::Parse { .. } => "E_PARSE",
            Error::Config(_) => "E_CONFIG",
            Error::Io(_) => "E_IO",
            Error::Json(_) => "E_JSON",
            Error::Toml(_) => "E_TOML",
            Error::WithContext { source, .. } => source.error_code(),
        }
    }
}
