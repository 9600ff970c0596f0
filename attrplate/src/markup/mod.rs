//! Minimal markup front end
//!
//! Turns template source into a [`Document`] tree: elements with ordered
//! attributes and children, and text. Tokens come from `html5gum`; comments,
//! doctype and processing instructions are dropped.
pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{Closing, Document, Element, Node};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;
