pub mod commands;
pub mod interface;
pub mod progress;

pub use interface::{Cli, Command};
