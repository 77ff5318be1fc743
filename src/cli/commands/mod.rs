use anyhow::Result;
use clap::{Args, Parser, Subcommand};

mod view;

pub use view::{ViewArgs, handle_view};

#[derive(Parser)]
#[command(name = "gitlab-issue")]
#[command(about = "Work with GitLab issues from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with issues
    Issue(IssueArgs),
}

#[derive(Args)]
pub struct IssueArgs {
    #[command(subcommand)]
    pub command: IssueCommands,
}

#[derive(Subcommand)]
pub enum IssueCommands {
    /// Display the title, body, and other information about an issue
    #[command(visible_alias = "show")]
    View(ViewArgs),
}

pub fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Issue(issue) => match issue.command {
            IssueCommands::View(args) => handle_view(args),
        },
    }
}
