mod cli;
pub mod errors;
mod handlers;
mod logging;
mod ui;

use std::env;
use std::process::ExitCode;
use clap::Parser;
use crate::cli::{Cli, Commands};
use crate::errors::{CliError, ERROR_EXIT_CODE};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERR -- {}", e);
            ExitCode::from(ERROR_EXIT_CODE)
        }
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    let cwd = env::current_dir().map_err(CliError::CurrentDir)?;

    match command {
        Commands::Init { root_name, remote } => handlers::init::handle_init(&cwd, &root_name, &remote),
        Commands::Shot { run } => handlers::shot::handle_shot(&cwd, run),
        Commands::Pull { id, run } => handlers::pull::handle_pull(&cwd, id, run),
        Commands::List { id } => handlers::list::handle_list(&cwd, id),
        Commands::Check { path, id } => handlers::check::handle_check(&cwd, &path, id),
    }
}
