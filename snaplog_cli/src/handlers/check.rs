use std::path::Path;
use snaplog::Project;
use crate::errors::CliError;

pub fn handle_check(cwd: &Path, path: &str, id: Option<u32>) -> Result<(), CliError> {
    let project = Project::open(cwd)?;
    let copied = project.checkout(path, id)?;

    for dst in &copied {
        let shown = dst.strip_prefix(project.root()).unwrap_or(dst);
        println!("OK -- {}", shown.display());
    }
    println!("{} files copied", copied.len());
    Ok(())
}
