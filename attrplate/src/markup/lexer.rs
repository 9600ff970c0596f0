//! Token stream for template markup
//!
//! Tokenizing is done by `html5gum`. Its tokens carry no source positions
//! and keep attributes in a sorted map, so the lexer follows along in the
//! source to give every tag a line and column and to put attributes back in
//! declaration order.

use crate::error::{Error, Result};
use html5gum::{State, Token as HtmlToken, Tokenizer};
use indexmap::IndexMap;
use std::fmt;

/// Token types for template markup
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Text as markup: `&` and `<` are escaped again outside raw text elements
    Text(String),

    StartTag {
        name: String,
        attributes: Vec<(String, Option<String>)>,
        self_closing: bool,
    }, // <name attr="value"> or <name/>
    EndTag(String), // </name>

    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at {}:{}", self.kind, self.line, self.column)
    }
}

/// Lexer for template markup
pub struct Lexer<'a> {
    source: &'a str,
    /// Byte offset up to which the source has been matched against tokens
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokenizer = Tokenizer::new(self.source);
        let mut tokens: Vec<Token> = Vec::new();
        let mut in_raw_text = false;

        while let Some(token_result) = tokenizer.next() {
            let token = token_result
                .map_err(|_| Error::parse("tokenizer error", self.line, self.column))?;

            match token {
                HtmlToken::StartTag(tag) => {
                    let name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                    let values: Vec<(String, String)> = tag
                        .attributes
                        .iter()
                        .map(|(k, v)| {
                            (
                                String::from_utf8_lossy(k).into_owned(),
                                String::from_utf8_lossy(v).into_owned(),
                            )
                        })
                        .collect();

                    let (line, column, declared) = match self.locate("<", &name) {
                        Some(start) => {
                            self.advance_to(start);
                            let (line, column) = (self.line, self.column);
                            let (declared, end) =
                                scan_attributes(self.source, start + 1 + name.len());
                            self.advance_to(end);
                            (line, column, declared)
                        }
                        None => (self.line, self.column, Vec::new()),
                    };

                    if !tag.self_closing {
                        match name.as_str() {
                            "script" | "style" => {
                                tokenizer.set_state(State::ScriptData);
                                in_raw_text = true;
                            }
                            "textarea" | "title" => tokenizer.set_state(State::RcData),
                            _ => {}
                        }
                    }

                    tokens.push(Token::new(
                        TokenKind::StartTag {
                            name,
                            attributes: in_declaration_order(values, declared),
                            self_closing: tag.self_closing,
                        },
                        line,
                        column,
                    ));
                }

                HtmlToken::EndTag(tag) => {
                    let name = String::from_utf8_lossy(&tag.name).to_ascii_lowercase();
                    in_raw_text = false;

                    let (line, column) = match self.locate("</", &name) {
                        Some(start) => {
                            self.advance_to(start);
                            let position = (self.line, self.column);
                            let end = self.source[start..]
                                .find('>')
                                .map_or(self.source.len(), |i| start + i + 1);
                            self.advance_to(end);
                            position
                        }
                        None => (self.line, self.column),
                    };
                    tokens.push(Token::new(TokenKind::EndTag(name), line, column));
                }

                HtmlToken::String(text) => {
                    let text = String::from_utf8_lossy(&text);
                    let text = if in_raw_text {
                        text.into_owned()
                    } else {
                        escape_text(&text)
                    };

                    // html5gum may split one run of text over several tokens
                    match tokens.last_mut() {
                        Some(Token {
                            kind: TokenKind::Text(previous),
                            ..
                        }) => previous.push_str(&text),
                        _ => tokens.push(Token::new(TokenKind::Text(text), self.line, self.column)),
                    }
                }

                HtmlToken::Comment(_) | HtmlToken::Doctype(_) => self.skip_declaration(),

                HtmlToken::Error(error) => {
                    log::debug!(
                        "markup recovered from {:?} near {}:{}",
                        error,
                        self.line,
                        self.column
                    );
                }
            }
        }

        tokens.push(Token::new(TokenKind::Eof, self.line, self.column));
        Ok(tokens)
    }

    /// Offset of the next `open` + `name` tag opening at or after the cursor
    fn locate(&self, open: &str, name: &str) -> Option<usize> {
        let rest = &self.source[self.offset..];
        rest.match_indices(open)
            .map(|(i, _)| i)
            .find(|&i| {
                let after = &rest[i + open.len()..];
                let name_matches = after
                    .get(..name.len())
                    .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name));
                let boundary = after
                    .get(name.len()..)
                    .and_then(|tail| tail.chars().next())
                    .map_or(true, |c| c.is_whitespace() || c == '/' || c == '>');
                name_matches && boundary
            })
            .map(|i| self.offset + i)
    }

    /// Move past the next comment, doctype or processing instruction
    fn skip_declaration(&mut self) {
        let rest = &self.source[self.offset..];
        let Some(start) = rest.find("<!").into_iter().chain(rest.find("<?")).min() else {
            return;
        };

        let end = if rest[start..].starts_with("<!--") {
            rest[start + 4..].find("-->").map(|i| start + 4 + i + 3)
        } else {
            rest[start..].find('>').map(|i| start + i + 1)
        };
        self.advance_to(self.offset + end.unwrap_or(rest.len()));
    }

    fn advance_to(&mut self, target: usize) {
        if target <= self.offset {
            return;
        }
        for ch in self.source[self.offset..target].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = target;
    }
}

/// Scan the attribute list of a start tag whose name ends at byte `from`
///
/// Returns each declared attribute name with whether it was given a value,
/// and the offset just past the closing `>`.
fn scan_attributes(source: &str, from: usize) -> (Vec<(String, bool)>, usize) {
    let Some(rest) = source.get(from..) else {
        return (Vec::new(), source.len());
    };
    let mut chars = rest.char_indices().peekable();
    let mut declared = Vec::new();

    loop {
        while chars
            .next_if(|(_, c)| c.is_whitespace() || *c == '/')
            .is_some()
        {}
        match chars.peek() {
            None => return (declared, source.len()),
            Some((i, '>')) => return (declared, from + i + 1),
            _ => {}
        }

        let mut name = String::new();
        while let Some((_, c)) =
            chars.next_if(|(_, c)| !(c.is_whitespace() || matches!(*c, '/' | '=' | '>')))
        {
            name.push(c.to_ascii_lowercase());
        }

        while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let has_value = chars.next_if(|(_, c)| *c == '=').is_some();
        if has_value {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            match chars.peek().map(|(_, c)| *c) {
                Some(quote @ ('"' | '\'')) => {
                    chars.next();
                    while chars.next_if(|(_, c)| *c != quote).is_some() {}
                    chars.next();
                }
                _ => {
                    while chars
                        .next_if(|(_, c)| !c.is_whitespace() && *c != '>')
                        .is_some()
                    {}
                }
            }
        }

        if !name.is_empty() {
            declared.push((name, has_value));
        }
    }
}

fn in_declaration_order(
    values: Vec<(String, String)>,
    declared: Vec<(String, bool)>,
) -> Vec<(String, Option<String>)> {
    let mut values: IndexMap<String, String> = values.into_iter().collect();
    let mut ordered = Vec::with_capacity(values.len());

    for (name, has_value) in declared {
        if let Some(value) = values.shift_remove(&name) {
            ordered.push((name, has_value.then_some(value)));
        }
    }
    ordered.extend(values.into_iter().map(|(name, value)| (name, Some(value))));
    ordered
}

/// Re-escape decoded text so it reads as markup again
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}
