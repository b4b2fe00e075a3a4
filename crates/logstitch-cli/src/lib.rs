mod args;
mod commands;
pub mod config;
pub mod csv_sink;
mod handlers;
pub mod types;

pub use args::{Cli, Commands, ExportArgs};
pub use commands::run;
