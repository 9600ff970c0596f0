use anyhow::Result;
use std::path::PathBuf;

pub fn run(template_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let template = super::load_template(&template_path, config_path.as_deref())?;
    template.validate()?;

    let elements = template.document().elements().count();
    println!("{}: ok ({} elements)", template_path.display(), elements);
    Ok(())
}
