use clap::Parser;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;

use args::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warn, or debug with --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load .env file if present
    let _ = dotenvy::dotenv();

    let result = match &cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::Preview(args) => commands::preview::run(args),
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
