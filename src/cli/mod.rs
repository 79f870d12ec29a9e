pub mod args;
pub mod commands;

pub use args::{run_cli, Cli};
