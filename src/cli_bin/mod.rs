//! CLI module for the argrouter demo binary
//!
//! Global flags are parsed with clap; everything after them is handed to a
//! [`Router`](argrouter::Router) built from the handlers in `commands`.

pub mod args;
pub mod commands;
