use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use better_todo::cli;
use better_todo::cli::commands::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli_args = Cli::parse();
    let globals = cli_args.globals;

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&globals),
        Commands::List(cmd) => cli::list::run(cmd, &globals),
        Commands::Task(cmd) => cli::task::run(cmd, &globals),
        Commands::View { completed } => cli::view::run(completed, &globals),
        Commands::Recur(cmd) => cli::recur::run(cmd, &globals),
        Commands::Status => cli::status::run(&globals),
    };

    process::exit(exit_code);
}
