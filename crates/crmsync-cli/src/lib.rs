//! crmsync CLI library.
//!
//! Configuration, command execution and output formatting for the `crmsync`
//! binary: run an extraction pass over a saved page and inspect or prune the
//! local record collection.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
