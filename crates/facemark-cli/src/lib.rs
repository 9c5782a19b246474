//! Command-line front end for facemark.
//!
//! This crate provides:
//! - Argument parsing for the record-driven operations and the image tools
//! - Environment configuration
//! - Structured operation logging
//! - Interactive labeling on stdin

pub mod args;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;

pub use args::{Cli, Command};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
pub use logging::OperationLogger;
pub use runner::{run, PromptLabeler};
