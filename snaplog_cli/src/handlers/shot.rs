use std::path::Path;
use snaplog::Project;
use crate::cli::RunFlags;
use crate::errors::CliError;
use crate::ui::printer::{print_apply_report, print_plan};

pub fn handle_shot(cwd: &Path, run: RunFlags) -> Result<(), CliError> {
    let mut project = Project::open(cwd)?;
    let plan = project.prepare_shot()?;

    println!("\nChanges to commit:\n");
    print_plan(&plan);

    if !run.should_apply() {
        println!("\nDry run. Snapshot is NOT committed.");
        println!("Please specify --go to commit the changes.");
        return Ok(());
    }

    let report = project.commit_shot(&plan)?;
    print_apply_report(&report);
    println!("OK -- snapshot {:04} committed.", plan.snap_id);
    Ok(())
}
