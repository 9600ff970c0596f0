use super::ast::{is_void_element, Closing, Document, Element, Node};
use super::lexer::{Lexer, Token, TokenKind};
use crate::error::{Error, Result};

/// Element still waiting for its end tag
struct OpenElement {
    element: Element,
    line: usize,
    column: usize,
}

/// Parser for template markup
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    /// Create a new parser from input string
    pub fn new(input: &str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire document
    pub fn parse(&mut self) -> Result<Document> {
        let mut document = Document::new();
        let mut open: Vec<OpenElement> = Vec::new();

        while let Some(token) = self.tokens.get(self.position).cloned() {
            self.position += 1;

            match token.kind {
                TokenKind::Eof => break,

                TokenKind::Text(text) => {
                    append(&mut document, &mut open, Node::Text(text));
                }

                TokenKind::StartTag {
                    name,
                    attributes,
                    self_closing,
                } => {
                    let mut element = Element::new(name);
                    for (attr_name, value) in attributes {
                        element.attributes.insert(attr_name, value);
                    }

                    if self_closing {
                        element.closing = Closing::SelfClosing;
                        append(&mut document, &mut open, Node::Element(element));
                    } else if is_void_element(&element.name) {
                        element.closing = Closing::Void;
                        append(&mut document, &mut open, Node::Element(element));
                    } else {
                        open.push(OpenElement {
                            element,
                            line: token.line,
                            column: token.column,
                        });
                    }
                }

                // void elements never sit on the open stack
                TokenKind::EndTag(name) if is_void_element(&name) => {
                    log::debug!("ignoring stray </{}> at {}:{}", name, token.line, token.column);
                }

                TokenKind::EndTag(name) => match open.pop() {
                    Some(current) if current.element.name == name => {
                        append(&mut document, &mut open, Node::Element(current.element));
                    }
                    Some(current) => {
                        return Err(Error::parse(
                            format!(
                                "unexpected </{}>, expected </{}> (opened at {}:{})",
                                name, current.element.name, current.line, current.column
                            ),
                            token.line,
                            token.column,
                        ));
                    }
                    None => {
                        return Err(Error::parse(
                            format!("unexpected </{}> with no open element", name),
                            token.line,
                            token.column,
                        ));
                    }
                },
            }
        }

        if let Some(unclosed) = open.pop() {
            return Err(Error::parse(
                format!("<{}> is never closed", unclosed.element.name),
                unclosed.line,
                unclosed.column,
            ));
        }

        Ok(document)
    }
}

fn append(document: &mut Document, open: &mut [OpenElement], node: Node) {
    match open.last_mut() {
        Some(parent) => parent.element.children.push(node),
        None => document.children.push(node),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_elements() {
        let document = Document::parse(
            r#"<ul t:each="student: ${students}"><li t:text="${student.name}">x</li></ul>"#,
        )
        .unwrap();

        assert_eq!(document.children.len(), 1);
        let Node::Element(ul) = &document.children[0] else {
            panic!("Expected element");
        };
        assert_eq!(ul.name, "ul");
        assert_eq!(ul.attr("t:each"), Some("student: ${students}"));

        let Node::Element(li) = &ul.children[0] else {
            panic!("Expected element");
        };
        assert_eq!(li.attr("t:text"), Some("${student.name}"));
        assert_eq!(li.children, vec![Node::Text("x".to_string())]);
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let document = Document::parse("<p>\n  Hello  </p>").unwrap();
        let Node::Element(p) = &document.children[0] else {
            panic!("Expected element");
        };
        assert_eq!(p.children, vec![Node::Text("\n  Hello  ".to_string())]);
    }

    #[test]
    fn test_attribute_order_is_preserved() {
        let document = Document::parse(r#"<a z="1" a="2" m="3"></a>"#).unwrap();
        let element = document.elements().next().unwrap();
        let names: Vec<&str> = element.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_self_closing_and_void() {
        let document = Document::parse("<div><br/><img src=a.png><p>x</p></div>").unwrap();
        let closings: Vec<(&str, Closing)> = document
            .elements()
            .map(|e| (e.name.as_str(), e.closing))
            .collect();
        assert_eq!(
            closings,
            vec![
                ("div", Closing::EndTag),
                ("br", Closing::SelfClosing),
                ("img", Closing::Void),
                ("p", Closing::EndTag),
            ]
        );
    }

    #[test]
    fn test_mismatched_end_tag() {
        let error = Document::parse("<div>\n<p></div>").unwrap_err();
        match error {
            Error::Parse {
                message,
                line,
                column,
            } => {
                assert!(message.contains("expected </p>"));
                assert_eq!((line, column), (2, 4));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_element() {
        let error = Document::parse("<html><body>").unwrap_err();
        assert!(error.to_string().contains("<body> is never closed"));
    }

    #[test]
    fn test_stray_end_tag() {
        assert!(Document::parse("</p>").is_err());
        assert!(Document::parse("<p>x</p></br>").is_ok());
    }

    #[test]
    fn test_void_end_tag_inside_element() {
        let document = Document::parse("<div><br></br><span>x</span></div>").unwrap();
        assert_eq!(document.children.len(), 1);

        let Node::Element(div) = &document.children[0] else {
            panic!("Expected element");
        };
        let names: Vec<&str> = div
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Element(e) => Some(e.name.as_str()),
                Node::Text(_) => None,
            })
            .collect();
        assert_eq!(names, vec!["br", "span"]);
    }

    #[test]
    fn test_many_comments_before_content() {
        let input = format!("{}<p>x</p>", "<!---->".repeat(3_000));
        let document = Document::parse(&input).unwrap();
        assert_eq!(document.elements().count(), 1);
    }
}
