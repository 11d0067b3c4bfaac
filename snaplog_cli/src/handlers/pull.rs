use std::path::Path;
use snaplog::Project;
use snaplog::project::PullError;
use crate::cli::RunFlags;
use crate::errors::CliError;
use crate::ui::printer::{print_apply_report, print_plan};

pub fn handle_pull(cwd: &Path, id: Option<u32>, run: RunFlags) -> Result<(), CliError> {
    let mut project = Project::open(cwd)?;
    let plan = match project.prepare_pull(id) {
        Ok(plan) => plan,
        Err(PullError::NothingToRestore) => {
            println!("No available snapshot to restore from remote.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("\nChanges to restore:\n");
    print_plan(&plan);

    if !run.should_apply() {
        println!("\nDry run. Snapshot is NOT restored.");
        println!("Please specify --go to restore the files.");
        return Ok(());
    }

    let report = project.apply_pull(&plan)?;
    print_apply_report(&report);
    println!("OK -- snapshot {:04} restored.", plan.snap_id);
    Ok(())
}
