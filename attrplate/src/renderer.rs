use crate::config::RenderConfig;
use crate::context::Context;
use crate::directive::DirectiveEvaluator;
use crate::error::Result;
use crate::markup::{Closing, Document, Element, Node};
use crate::output::Output;
use crate::value::Value;

/// What the renderer does with one element
#[derive(Debug, Clone, PartialEq)]
pub enum ElementState {
    /// Conditional present and false: nothing is emitted
    Skip,
    /// Iteration present: render once per item with `variable` bound
    Repeat { variable: String, items: Vec<Value> },
    /// Render once
    Single,
}

/// Attribute-driven template renderer
///
/// Walks a [`Document`] and writes markup to an [`Output`]. For every element
/// the conditional directive is checked first, then iteration, then text.
/// Literal text nodes are trimmed and whitespace-only ones dropped.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    evaluator: DirectiveEvaluator,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            evaluator: DirectiveEvaluator::new(config),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        self.evaluator.config()
    }

    pub fn evaluator(&self) -> &DirectiveEvaluator {
        &self.evaluator
    }

    /// Render a whole document
    ///
    /// The document root itself carries no directives; its children go through
    /// the normal element decision. On error, output already appended stays
    /// appended and `context` is back in the state it had on entry.
    pub fn render(
        &self,
        document: &Document,
        context: &mut Context,
        out: &mut dyn Output,
    ) -> Result<()> {
        log::debug!(
            "rendering document with {} top-level nodes",
            document.children.len()
        );

        let result = document
            .children
            .iter()
            .try_for_each(|node| self.render_node(node, context, out));

        match &result {
            Ok(()) => log::debug!("render finished"),
            Err(e) => log::warn!("render aborted: {}", e),
        }
        result
    }

    /// Render a document into a new string
    pub fn render_to_string(&self, document: &Document, context: &mut Context) -> Result<String> {
        let mut out = String::new();
        self.render(document, context, &mut out)?;
        Ok(out)
    }

    /// Decide how `element` is rendered under `context`
    pub fn element_state(&self, element: &Element, context: &Context) -> Result<ElementState> {
        let config = self.evaluator.config();

        if let Some(condition) = element.attr(&config.conditional_attribute) {
            if !self.evaluator.evaluate_conditional(condition, context)? {
                return Ok(ElementState::Skip);
            }
        }

        if let Some(iteration) = element.attr(&config.iteration_attribute) {
            let (variable, items) = self.evaluator.evaluate_iteration(iteration, context)?;
            return Ok(ElementState::Repeat { variable, items });
        }

        Ok(ElementState::Single)
    }

    fn render_node(&self, node: &Node, context: &mut Context, out: &mut dyn Output) -> Result<()> {
        match node {
            Node::Element(element) => self.process_element(element, context, out),
            Node::Text(text) => self.emit_text(text, out),
        }
    }

    fn process_element(
        &self,
        element: &Element,
        context: &mut Context,
        out: &mut dyn Output,
    ) -> Result<()> {
        let state = self.element_state(element, context)?;
        log::trace!("<{}>: {:?}", element.name, state);

        match state {
            ElementState::Skip => Ok(()),
            ElementState::Single => self.render_single(element, context, out),
            ElementState::Repeat { variable, items } => {
                // restored on drop, including early return through `?`
                let mut scope = context.shadow(variable);
                for (index, item) in items.into_iter().enumerate() {
                    log::trace!("<{}> iteration {} of `{}`", element.name, index, scope.name());
                    scope.bind(item);
                    self.render_single(element, &mut scope, out)?;
                }
                Ok(())
            }
        }
    }

    fn render_single(
        &self,
        element: &Element,
        context: &mut Context,
        out: &mut dyn Output,
    ) -> Result<()> {
        let config = self.evaluator.config();

        if let Some(text) = element.attr(&config.text_attribute) {
            let text = self.evaluator.evaluate_text(text, context)?;
            self.open_tag(element, ">", out)?;
            out.append(&text)?;
            self.line_break(out)?;
            return self.close_tag(element, out);
        }

        match element.closing {
            Closing::SelfClosing => return self.open_tag(element, "/>", out),
            Closing::Void => return self.open_tag(element, ">", out),
            Closing::EndTag => {}
        }

        self.open_tag(element, ">", out)?;
        for child in &element.children {
            self.render_node(child, context, out)?;
        }
        self.close_tag(element, out)
    }

    fn open_tag(&self, element: &Element, terminator: &str, out: &mut dyn Output) -> Result<()> {
        let config = self.evaluator.config();
        let mut tag = format!("<{}", element.name);

        for (name, value) in &element.attributes {
            if config.is_directive(name) {
                continue;
            }
            match value {
                Some(value) => tag.push_str(&format!(" {}={}", name, quote_attribute(value))),
                None => tag.push_str(&format!(" {}", name)),
            }
        }
        tag.push_str(terminator);

        out.append(&tag)?;
        self.line_break(out)
    }

    fn close_tag(&self, element: &Element, out: &mut dyn Output) -> Result<()> {
        out.append(&format!("</{}>", element.name))
    }

    fn emit_text(&self, text: &str, out: &mut dyn Output) -> Result<()> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        out.append(trimmed)?;
        self.line_break(out)
    }

    fn line_break(&self, out: &mut dyn Output) -> Result<()> {
        if self.evaluator.config().line_breaks {
            out.append("\n")?;
        }
        Ok(())
    }
}

/// Quote a decoded attribute value so it reads back the same
fn quote_attribute(value: &str) -> String {
    let value = value.replace('&', "&amp;");
    if value.contains('"') && !value.contains('\'') {
        format!("'{}'", value)
    } else {
        format!("\"{}\"", value.replace('"', "&quot;"))
    }
}
