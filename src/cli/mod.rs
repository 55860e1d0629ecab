//! The `options-cli` command line interface

pub mod app;
pub mod handlers;
mod prompts;

pub use app::{Cli, Commands};
pub use handlers::{CliOptions, execute, run};
