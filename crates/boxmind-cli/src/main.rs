mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use commands::CommandContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = CommandContext::new(cli.root, cli.config.as_deref(), cli.format)?;

    match cli.command {
        Commands::Index(args) => commands::index::run(&ctx, args),
        Commands::Search(args) => commands::search::run(&ctx, args),
        Commands::Context(args) => commands::context::run(&ctx, args),
        Commands::Compact(args) => commands::compact::run(&ctx, args).await,
        Commands::Stats(args) => commands::stats::run(&ctx, args),
    }
}
