//! Command-line argument definitions for the demo binary

use clap::Parser;

/// Main CLI application
#[derive(Parser, Debug)]
#[command(
    name = "argrouter",
    version,
    about = "Dispatch a command line through a typed argument router",
    long_about = "argrouter parses its own global flags, then routes the remaining \
                  tokens to one of the demo commands (greet, echo, math add, \
                  math add float, math div). Pass -h after a command to see its help."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output, including command help
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List registered commands and exit
    #[arg(long)]
    pub list: bool,

    /// Command tokens passed to the router
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Cli {
    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Error
        } else {
            log::LevelFilter::Warn
        }
    }
}
