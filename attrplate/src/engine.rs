use crate::config::RenderConfig;
use crate::context::Context;
use crate::error::{ErrorContext, Result};
use crate::markup::Document;
use crate::output::Output;
use crate::renderer::Renderer;
use std::fs;
use std::path::Path;

/// A parsed template ready to be rendered any number of times
///
/// ```
/// use attrplate::{Context, Template};
///
/// let template = Template::parse(r#"<p t:text="${name}">x</p>"#).unwrap();
/// let mut context = Context::new();
/// context.put("name", "Ivan");
/// assert_eq!(template.render_to_string(&mut context).unwrap(), "<p>Ivan</p>");
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    document: Document,
    renderer: Renderer,
}

impl Template {
    /// Parse template source with the default configuration
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_named("<inline>", source)
    }

    fn parse_named(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let document = Document::parse(source).with_context(|| format!("in template {}", name))?;
        log::debug!("parsed template {}", name);

        Ok(Self {
            name,
            document,
            renderer: Renderer::default(),
        })
    }

    /// Read and parse a template file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let source = fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read template '{}'", path_ref.display()))?;

        Self::parse_named(path_ref.display().to_string(), &source)
    }

    /// Replace the rendering configuration
    ///
    /// The configuration is validated first, so a config built in code is held
    /// to the same rules as one loaded from TOML.
    pub fn with_config(mut self, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        self.renderer = Renderer::new(config);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RenderConfig {
        self.renderer.config()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Check every directive expression without rendering
    ///
    /// Only syntax is checked: names are not resolved, so a template that
    /// validates can still fail to render against a given context.
    pub fn validate(&self) -> Result<()> {
        let evaluator = self.renderer.evaluator();
        for element in self.document.elements() {
            evaluator
                .check(element)
                .with_context(|| format!("in <{}> of template {}", element.name, self.name))?;
        }
        Ok(())
    }

    /// Render into `out`
    pub fn render(&self, context: &mut Context, out: &mut dyn Output) -> Result<()> {
        self.renderer.render(&self.document, context, out)
    }

    pub fn render_to_string(&self, context: &mut Context) -> Result<String> {
        self.renderer.render_to_string(&self.document, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;

    #[test]
    fn test_render_is_repeatable() {
        let template = Template::parse(r#"<b t:if="${on}">on</b>"#).unwrap();

        let mut context = Context::new();
        context.put("on", true);
        assert_eq!(template.render_to_string(&mut context).unwrap(), "<b>on</b>");

        context.put("on", false);
        assert_eq!(template.render_to_string(&mut context).unwrap(), "");
    }

    #[test]
    fn test_with_config() {
        let config = RenderConfig {
            text_attribute: "data-text".to_string(),
            ..RenderConfig::default()
        };
        let template = Template::parse(r#"<p data-text="${x}" t:text="kept"></p>"#)
            .unwrap()
            .with_config(config)
            .unwrap();

        let mut context = Context::new();
        context.put("x", 5);
        assert_eq!(
            template.render_to_string(&mut context).unwrap(),
            r#"<p t:text="kept">5</p>"#
        );
    }

    #[test]
    fn test_validate() {
        let template = Template::parse(
            r#"<ul t:each="s: ${students}"><li t:text="${s.name}"></li></ul>"#,
        )
        .unwrap();
        assert!(template.validate().is_ok());

        let template = Template::parse(r#"<div><p t:each="students">x</p></div>"#).unwrap();
        let error = template.validate().unwrap_err();
        assert!(matches!(
            error.root_cause(),
            Error::InvalidDirectiveSyntax { attribute, .. } if attribute == "t:each"
        ));
        assert!(error.to_string().contains("<p>"));
    }

    #[test]
    fn test_validate_respects_depth_limit() {
        let template = Template::parse(r#"<p t:text="${a.b.c}"></p>"#)
            .unwrap()
            .with_config(RenderConfig {
                max_path_segments: Some(1),
                ..RenderConfig::default()
            })
            .unwrap();
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_with_config_rejects_invalid_config() {
        let template = Template::parse("<p>x</p>").unwrap();

        let zero_depth = RenderConfig {
            max_path_segments: Some(0),
            ..RenderConfig::default()
        };
        let error = template.clone().with_config(zero_depth).unwrap_err();
        assert_eq!(error.error_code(), "E_CONFIG");

        let clashing = RenderConfig {
            text_attribute: "t:if".to_string(),
            ..RenderConfig::default()
        };
        let error = template.with_config(clashing).unwrap_err();
        assert!(error.to_string().contains("distinct"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h1 t:text=\"${{title}}\"></h1>").unwrap();

        let template = Template::from_file(file.path()).unwrap();
        assert_eq!(template.name(), file.path().display().to_string());

        let mut context = Context::new();
        context.put("title", "Home");
        assert_eq!(template.render_to_string(&mut context).unwrap(), "<h1>Home</h1>");
    }

    #[test]
    fn test_from_missing_file() {
        let error = Template::from_file("/nonexistent/page.html").unwrap_err();
        assert_eq!(error.error_code(), "E_IO");
        assert!(error.to_string().contains("/nonexistent/page.html"));
    }

    #[test]
    fn test_parse_error_names_template() {
        let error = Template::parse("<div>").unwrap_err();
        assert!(matches!(error.root_cause(), Error::Parse { .. }));
        assert!(error.to_string().contains("<inline>"));
    }
}
