//! Directive expression grammar
//!
//! ```text
//! identifier    := [A-Za-z0-9_]+
//! interpolation := "${" identifier ("." identifier)* ["()"] "}"
//! iteration     := ws* identifier ":" ws* interpolation
//! condition     := "true" | "false" | interpolation      (literals case-insensitive)
//! ```
//!
//! The `()` call suffix is only accepted by the iteration form and only on the
//! last segment; the root name itself can never be called. Every rule matches
//! the whole attribute value.

use std::fmt;

/// One step after the root name of a property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Attribute read, `.name`
    Property(String),
    /// Zero-argument accessor call, `.name()`
    Call(String),
}

impl Segment {
    pub fn name(&self) -> &str {
        match self {
            Segment::Property(name) | Segment::Call(name) => name,
        }
    }
}

/// A parsed `${root.segment...}` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    pub root: String,
    pub segments: Vec<Segment>,
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}", self.root)?;
        for segment in &self.segments {
            match segment {
                Segment::Property(name) => write!(f, ".{}", name)?,
                Segment::Call(name) => write!(f, ".{}()", name)?,
            }
        }
        f.write_str("}")
    }
}

/// Parsed iteration directive, `variable: ${source}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub variable: String,
    pub source: PropertyPath,
}

/// Parsed conditional directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Literal(bool),
    Path(PropertyPath),
}

/// Limits applied while parsing paths
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathSyntax {
    /// Maximum number of segments after the root name, `None` for unlimited
    pub max_segments: Option<usize>,
}

impl PathSyntax {
    pub fn unlimited() -> Self {
        Self { max_segments: None }
    }

    pub fn with_max_segments(max_segments: usize) -> Self {
        Self {
            max_segments: Some(max_segments),
        }
    }

    fn allows(&self, path: &PropertyPath) -> bool {
        self.max_segments
            .map_or(true, |max| path.segments.len() <= max)
    }
}

/// Parse a text directive value (or the path form of a condition)
pub fn parse_interpolation(input: &str, syntax: PathSyntax) -> Option<PropertyPath> {
    let mut cursor = Cursor::new(input);
    let path = cursor.interpolation(false)?;
    (cursor.at_end() && syntax.allows(&path)).then_some(path)
}

/// Parse an iteration directive value
pub fn parse_iteration(input: &str, syntax: PathSyntax) -> Option<Iteration> {
    let mut cursor = Cursor::new(input);
    cursor.skip_whitespace();
    let variable = cursor.identifier()?;
    if !cursor.eat(":") {
        return None;
    }
    cursor.skip_whitespace();
    let source = cursor.interpolation(true)?;
    (cursor.at_end() && syntax.allows(&source)).then_some(Iteration { variable, source })
}

/// Parse a conditional directive value
pub fn parse_condition(input: &str, syntax: PathSyntax) -> Option<Condition> {
    if input.eq_ignore_ascii_case("true") {
        return Some(Condition::Literal(true));
    }
    if input.eq_ignore_ascii_case("false") {
        return Some(Condition::Literal(false));
    }
    parse_interpolation(input, syntax).map(Condition::Path)
}

fn is_identifier_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.position += token.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.position += rest.len() - rest.trim_start().len();
    }

    fn identifier(&mut self) -> Option<String> {
        let len = self
            .rest()
            .bytes()
            .take_while(|b| is_identifier_char(*b))
            .count();
        if len == 0 {
            return None;
        }
        let ident = self.rest()[..len].to_string();
        self.position += len;
        Some(ident)
    }

    fn interpolation(&mut self, allow_call: bool) -> Option<PropertyPath> {
        if !self.eat("${") {
            return None;
        }
        let root = self.identifier()?;
        let mut segments = Vec::new();

        while self.eat(".") {
            let name = self.identifier()?;
            if self.eat("()") {
                if !allow_call {
                    return None;
                }
                segments.push(Segment::Call(name));
                // a call must be the last segment
                break;
            }
            segments.push(Segment::Property(name));
        }

        if !self.eat("}") {
            return None;
        }
        Some(PropertyPath { root, segments })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any() -> PathSyntax {
        PathSyntax::unlimited()
    }

    #[test]
    fn test_simple_interpolation() {
        let path = parse_interpolation("${name}", any()).unwrap();
        assert_eq!(path.root, "name");
        assert!(path.segments.is_empty());
    }

    #[test]
    fn test_dotted_interpolation() {
        let path = parse_interpolation("${welcome.message}", any()).unwrap();
        assert_eq!(path.root, "welcome");
        assert_eq!(path.segments, vec![Segment::Property("message".into())]);
        assert_eq!(path.to_string(), "${welcome.message}");

        let deep = parse_interpolation("${a.b.c_1}", any()).unwrap();
        assert_eq!(deep.segments.len(), 2);
    }

    #[test]
    fn test_interpolation_rejects_surrounding_text() {
        assert!(parse_interpolation("Hello ${name}", any()).is_none());
        assert!(parse_interpolation("${name}!", any()).is_none());
        assert!(parse_interpolation(" ${name}", any()).is_none());
        assert!(parse_interpolation("${name", any()).is_none());
        assert!(parse_interpolation("${}", any()).is_none());
        assert!(parse_interpolation("${a..b}", any()).is_none());
        assert!(parse_interpolation("${a.b-c}", any()).is_none());
        assert!(parse_interpolation("name", any()).is_none());
    }

    #[test]
    fn test_interpolation_rejects_calls() {
        assert!(parse_interpolation("${items.size()}", any()).is_none());
    }

    #[test]
    fn test_segment_limit() {
        let one = PathSyntax::with_max_segments(1);
        assert!(parse_interpolation("${a.b}", one).is_some());
        assert!(parse_interpolation("${a.b.c}", one).is_none());
        assert!(parse_iteration("x: ${a.b.c()}", one).is_none());
    }

    #[test]
    fn test_iteration() {
        let iteration = parse_iteration("student: ${students}", any()).unwrap();
        assert_eq!(iteration.variable, "student");
        assert_eq!(iteration.source.root, "students");

        let iteration = parse_iteration("  s:${school.students}", any()).unwrap();
        assert_eq!(iteration.variable, "s");
        assert_eq!(
            iteration.source.segments,
            vec![Segment::Property("students".into())]
        );
    }

    #[test]
    fn test_iteration_with_call() {
        let iteration = parse_iteration("k: ${map.keys()}", any()).unwrap();
        assert_eq!(iteration.source.segments, vec![Segment::Call("keys".into())]);
        assert_eq!(iteration.source.to_string(), "${map.keys()}");
    }

    #[test]
    fn test_iteration_rejects_bad_forms() {
        assert!(parse_iteration("${students}", any()).is_none());
        assert!(parse_iteration("student ${students}", any()).is_none());
        assert!(parse_iteration("student : ${students}", any()).is_none());
        assert!(parse_iteration("student: ${students} ", any()).is_none());
        // call on the root name
        assert!(parse_iteration("s: ${students()}", any()).is_none());
        // call in the middle
        assert!(parse_iteration("s: ${a.b().c}", any()).is_none());
    }

    #[test]
    fn test_conditions() {
        assert_eq!(parse_condition("true", any()), Some(Condition::Literal(true)));
        assert_eq!(parse_condition("FALSE", any()), Some(Condition::Literal(false)));
        assert!(matches!(
            parse_condition("${user.active}", any()),
            Some(Condition::Path(_))
        ));
        assert_eq!(parse_condition("yes", any()), None);
    }
}
