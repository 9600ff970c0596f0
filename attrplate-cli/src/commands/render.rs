use anyhow::{Context as _, Result};
use attrplate::{Context, WriteOutput};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::PathBuf;

pub fn run(
    template_path: PathBuf,
    context_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<()> {
    let template = super::load_template(&template_path, config_path.as_deref())?;

    let mut context = match &context_path {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading context {}", path.display()))?;
            let json: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing context {}", path.display()))?;
            Context::from_json(json)?
        }
        None => Context::new(),
    };
    log::debug!("context has {} top-level names", context.len());

    match &output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            let mut out = WriteOutput::new(BufWriter::new(file));
            template.render(&mut context, &mut out)?;
            out.into_inner()?;
            log::info!("Rendered {} to {}", template_path.display(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = WriteOutput::new(stdout.lock());
            template.render(&mut context, &mut out)?;
            out.into_inner()?;
        }
    }

    Ok(())
}
