use anyhow::Result;
use attrplate::{RenderConfig, Template};
use std::path::Path;

pub mod check;
pub mod render;

/// Load a template, applying the configuration file when one is given
fn load_template(template: &Path, config: Option<&Path>) -> Result<Template> {
    let config = match config {
        Some(path) => RenderConfig::from_file(path)?,
        None => RenderConfig::default(),
    };

    let template = Template::from_file(template)?;
    Ok(template.with_config(config)?)
}
