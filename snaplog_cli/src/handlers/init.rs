use std::path::Path;
use snaplog::Project;
use crate::errors::CliError;

pub fn handle_init(cwd: &Path, root_name: &str, remote: &Path) -> Result<(), CliError> {
    let project = Project::init(cwd, root_name, remote)?;
    let remote = project.settings().default_remote()?;

    println!("OK -- current directory initialized as a project root.");
    println!("RootName:\t{}", project.settings().root_name());
    println!("RemotePath:\t{}", remote.display());
    println!();
    println!("You can now use one of the following commands, all of them are safe to run.");
    println!("pull, shot, list");
    println!();
    println!("You can rerun 'init' if you want to use a different RootName or RemotePath.");
    Ok(())
}
