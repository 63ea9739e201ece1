use clap::Parser;
use log::debug;
use std::process::ExitCode;

use argrouter::{print_help, ErrorCategory};

mod cli_bin;

use cli_bin::args::Cli;
use cli_bin::commands::build_router;

fn main() -> ExitCode {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut router = build_router();
    if !cli.quiet {
        router.set_help(print_help);
    }

    if cli.list {
        for (command, help) in router.commands() {
            println!("{:<16} {}", command, help);
        }
        return ExitCode::SUCCESS;
    }

    match router.run(&cli.command) {
        Ok(dispatched) => {
            debug!(
                "command '{}' done (help shown: {})",
                dispatched.command, dispatched.help_shown
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!("dispatch failed: {:?}", e);
            eprintln!("Error: {}", e);
            match e.category() {
                ErrorCategory::Handler => ExitCode::from(1),
                ErrorCategory::NoMatch | ErrorCategory::Parse => ExitCode::from(2),
            }
        }
    }
}
