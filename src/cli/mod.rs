// CLI module for audiometa
//
// Command-line front end over the library. Compiled into the binary only.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
