use crate::error::{Error, Result};
use crate::path::PathSyntax;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Rendering configuration
///
/// ```toml
/// conditional_attribute = "t:if"
/// iteration_attribute = "t:each"
/// text_attribute = "t:text"
/// line_breaks = false
/// # max_path_segments = 1
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Attribute holding the conditional directive
    #[serde(default = "default_conditional_attribute")]
    pub conditional_attribute: String,

    /// Attribute holding the iteration directive
    #[serde(default = "default_iteration_attribute")]
    pub iteration_attribute: String,

    /// Attribute holding the text directive
    #[serde(default = "default_text_attribute")]
    pub text_attribute: String,

    /// Emit a newline after every opening tag and text chunk
    #[serde(default)]
    pub line_breaks: bool,

    /// Maximum number of dotted segments after the root name
    #[serde(default)]
    pub max_path_segments: Option<usize>,
}

fn default_conditional_attribute() -> String {
    "t:if".to_string()
}

fn default_iteration_attribute() -> String {
    "t:each".to_string()
}

fn default_text_attribute() -> String {
    "t:text".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            conditional_attribute: default_conditional_attribute(),
            iteration_attribute: default_iteration_attribute(),
            text_attribute: default_text_attribute(),
            line_breaks: false,
            max_path_segments: None,
        }
    }
}

impl RenderConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let content = fs::read_to_string(path_ref).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {}. Make sure the file exists and is readable.",
                path_ref.display(),
                e
            ))
        })?;

        let config = Self::from_toml_str(&content).map_err(|e| {
            Error::config(format!(
                "Failed to parse config file '{}': {}. Check TOML syntax.",
                path_ref.display(),
                e
            ))
        })?;

        log::debug!(
            "Successfully loaded configuration from: {}",
            path_ref.display()
        );
        Ok(config)
    }

    /// Check that the three directive attributes are usable
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("conditional_attribute", &self.conditional_attribute),
            ("iteration_attribute", &self.iteration_attribute),
            ("text_attribute", &self.text_attribute),
        ];

        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(Error::config(format!("{} must not be empty", field)));
            }
        }

        if self.conditional_attribute == self.iteration_attribute
            || self.conditional_attribute == self.text_attribute
            || self.iteration_attribute == self.text_attribute
        {
            return Err(Error::config(
                "directive attribute names must be distinct".to_string(),
            ));
        }

        if self.max_path_segments == Some(0) {
            return Err(Error::config(
                "max_path_segments must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Whether `name` is one of the directive attributes
    pub fn is_directive(&self, name: &str) -> bool {
        name == self.conditional_attribute
            || name == self.iteration_attribute
            || name == self.text_attribute
    }

    pub fn path_syntax(&self) -> PathSyntax {
        PathSyntax {
            max_segments: self.max_path_segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.conditional_attribute, "t:if");
        assert_eq!(config.iteration_attribute, "t:each");
        assert_eq!(config.text_attribute, "t:text");
        assert!(!config.line_breaks);
        assert!(config.is_directive("t:each"));
        assert!(!config.is_directive("class"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = RenderConfig::from_toml_str(
            r#"
text_attribute = "data-text"
max_path_segments = 1
"#,
        )
        .unwrap();

        assert_eq!(config.text_attribute, "data-text");
        assert_eq!(config.conditional_attribute, "t:if");
        assert_eq!(config.path_syntax(), PathSyntax::with_max_segments(1));
    }

    #[test]
    fn test_validation() {
        assert!(RenderConfig::from_toml_str(r#"text_attribute = "t:if""#).is_err());
        assert!(RenderConfig::from_toml_str(r#"iteration_attribute = " ""#).is_err());
        assert!(RenderConfig::from_toml_str("max_path_segments = 0").is_err());
        assert!(RenderConfig::from_toml_str("line_breaks = \"yes\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "line_breaks = true").unwrap();

        let config = RenderConfig::from_file(file.path()).unwrap();
        assert!(config.line_breaks);

        let error = RenderConfig::from_file("/nonexistent/attrplate.toml").unwrap_err();
        assert_eq!(error.error_code(), "E_CONFIG");
    }
}
