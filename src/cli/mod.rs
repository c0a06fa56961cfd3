pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, ProbeArgs, SocketArgs};
pub use output::{OutputFormat, OutputFormatter, SocketReport};
