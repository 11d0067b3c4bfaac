use std::path::Path;
use snaplog::Project;
use crate::errors::CliError;
use crate::ui::printer::{print_plan, print_snapshot_header};

pub fn handle_list(cwd: &Path, id: Option<u32>) -> Result<(), CliError> {
    let project = Project::open(cwd)?;

    match id {
        Some(snap_id) => {
            let log = project.load_snapshot(snap_id)?;
            println!("\nCommitted changes:\n");
            print_plan(&log);
        }
        None => {
            let headers = project.list_snapshots()?;
            if headers.is_empty() {
                println!("No snapshots in the remote yet.");
            }
            for header in &headers {
                print_snapshot_header(header);
            }
        }
    }

    println!("Last snapshot synced: {}", project.settings().last_snapshot());
    println!("Please run 'shot' to see a list of changes from the last snapshot.");
    Ok(())
}
