pub mod cli;
pub mod load_config;
pub mod present;
pub mod select;

pub use cli::{run, Cli, Commands, ConvertArgs};
