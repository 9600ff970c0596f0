use super::parser::Parser;
use crate::error::Result;
use indexmap::IndexMap;

/// HTML elements that never have content or an end tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Parsed template document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse template source
    pub fn parse(input: &str) -> Result<Self> {
        Parser::new(input)?.parse()
    }

    /// Depth-first iterator over every element in document order
    pub fn elements(&self) -> Elements<'_> {
        Elements {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Node types of a document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Text as markup, with `&` and `<` escaped outside raw text elements
    Text(String),
}

/// How an element was closed in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Closing {
    /// `<p>...</p>`
    #[default]
    EndTag,
    /// `<br/>`
    SelfClosing,
    /// `<br>` for an HTML void element
    Void,
}

/// Element node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    /// Attributes in declaration order, `None` for valueless ones
    pub attributes: IndexMap<String, Option<String>>,
    pub children: Vec<Node>,
    pub closing: Closing,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add an attribute, builder style
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), Some(value.into()));
        self
    }

    /// Add a child node, builder style
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value; valueless attributes read as the empty string
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .map(|value| value.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// Iterator returned by [`Document::elements`]
pub struct Elements<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(element) = node {
                self.stack.extend(element.children.iter().rev());
                return Some(element);
            }
        }
        None
    }
}
