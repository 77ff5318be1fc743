use clap::Parser;
use env_logger::Env;

mod cli;
mod common;
mod remote;

use cli::{Cli, run_command};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(err) = run_command(cli) {
        eprintln!("{}", cli::error_report(&err));
        std::process::exit(1);
    }
}
