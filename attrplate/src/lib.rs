//! attrplate - a minimal attribute-driven server-side template renderer
//!
//! Templates are ordinary markup. Three directive attributes control output:
//! - `t:if="${user.active}"` keeps or drops an element
//! - `t:each="student: ${students}"` repeats an element per collection item
//! - `t:text="${student.name}"` replaces an element's children with a value
//!
//! Values come from a [`Context`] of named [`Value`]s. Domain objects take part
//! by implementing [`PropertySource`] or by being built as a [`Record`].

// Enforce error handling best practices
#![cfg_attr(
    not(test),
    warn(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
    )
)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used,))]

pub mod config;
pub mod context;
pub mod directive;
pub mod engine;
pub mod error;
pub mod markup;
pub mod output;
pub mod path;
pub mod renderer;
pub mod resolver;
pub mod value;

pub use config::RenderConfig;
pub use context::{Context, LoopBinding};
pub use directive::DirectiveEvaluator;
pub use engine::Template;
pub use error::{Error, ErrorChain, ErrorContext, Result};
pub use markup::Document;
pub use output::{Output, WriteOutput};
pub use renderer::Renderer;
pub use resolver::{CollectionExtractor, PathResolver};
pub use value::{PropertySource, Record, Value};
