//! Process-facing collaborators
//!
//! The router core never touches the process directly. Argument retrieval and
//! help output live here so embedders can swap them for their own functions.

pub mod args;
pub mod help;

pub use args::os_args;
pub use help::{no_help, print_help};
