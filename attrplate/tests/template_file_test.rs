use attrplate::{Context, RenderConfig, Template, WriteOutput};
use std::fs;
use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");

    fs::write(
        dir.path().join("index.html"),
        r#"<!DOCTYPE html>
<html>
  <!-- roster page -->
  <body>
    <h1 data-text="${school.name}">School</h1>
    <ul>
      <li data-each="s: ${school.students}" data-text="${s.name}"></li>
    </ul>
    <footer data-if="false">hidden</footer>
  </body>
</html>
"#,
    )
    .unwrap();

    fs::write(
        dir.path().join("attrplate.toml"),
        r#"
conditional_attribute = "data-if"
iteration_attribute = "data-each"
text_attribute = "data-text"
"#,
    )
    .unwrap();

    dir
}

#[test]
fn test_render_file_with_config() {
    let dir = setup();
    let config = RenderConfig::from_file(dir.path().join("attrplate.toml")).unwrap();
    let template = Template::from_file(dir.path().join("index.html"))
        .unwrap()
        .with_config(config)
        .unwrap();

    template.validate().expect("template should validate");

    let mut context = Context::from_json(serde_json::json!({
        "school": {
            "name": "Central",
            "students": [{ "name": "Ivan" }, { "name": "Maria" }, { "name": "Nikola" }]
        }
    }))
    .unwrap();

    let mut out = WriteOutput::new(Vec::new());
    template.render(&mut context, &mut out).unwrap();
    let html = String::from_utf8(out.into_inner().unwrap()).unwrap();

    assert_eq!(
        html,
        "<html><body><h1>Central</h1><ul>\
         <li>Ivan</li><li>Maria</li><li>Nikola</li>\
         </ul></body></html>"
    );
    assert!(!context.contains("s"));
}

#[test]
fn test_one_level_paths() {
    let dir = setup();
    let mut config = RenderConfig::from_file(dir.path().join("attrplate.toml")).unwrap();
    config.max_path_segments = Some(1);

    fs::write(
        dir.path().join("deep.html"),
        r#"<p data-text="${a.b.c}"></p>"#,
    )
    .unwrap();

    let template = Template::from_file(dir.path().join("deep.html"))
        .unwrap()
        .with_config(config)
        .unwrap();

    let error = template.validate().unwrap_err();
    assert_eq!(error.error_code(), "E_DIRECTIVE_SYNTAX");
}

#[test]
fn test_line_breaks_config() {
    let config = RenderConfig::from_toml_str("line_breaks = true").unwrap();
    let template = Template::parse("<ul><li>a</li><li>b</li></ul>")
        .unwrap()
        .with_config(config)
        .unwrap();

    let output = template.render_to_string(&mut Context::new()).unwrap();
    assert_eq!(output, "<ul>\n<li>\na\n</li><li>\nb\n</li></ul>");
}

#[test]
fn test_malformed_template_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.html");
    fs::write(&path, "<div><span></div>").unwrap();

    let error = Template::from_file(&path).unwrap_err();
    assert_eq!(error.error_code(), "E_PARSE");
    assert!(error.to_string().contains("broken.html"));
}
