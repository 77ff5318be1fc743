pub mod browser;
pub mod commands;
pub mod markdown;
pub mod normalize;
pub mod output;
pub mod target;

pub use commands::{Cli, Commands, IssueCommands, run_command};
pub use output::error_report;
