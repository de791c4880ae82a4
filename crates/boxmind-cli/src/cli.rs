use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "boxmind")]
#[command(version, about = "Boxmind - context continuity for pentest agent sessions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root holding `boxes/<name>` (defaults to ~/.local/share/boxmind)
    #[arg(long, global = true, env = "BOXMIND_ROOT")]
    pub root: Option<PathBuf>,

    /// Config file (defaults to ~/.config/boxmind/config.toml)
    #[arg(long, global = true, env = "BOXMIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Index a box's history into its long-term memory
    Index(BoxArgs),

    /// Search a box's long-term memory
    Search(SearchArgs),

    /// Print the retrieved-context block for a query
    Context(QueryArgs),

    /// Compact a box's history without a model (truncation)
    Compact(CompactArgs),

    /// Show memory and history statistics
    Stats(BoxArgs),
}

#[derive(Args)]
pub struct BoxArgs {
    /// Box name
    pub name: String,
}

#[derive(Args)]
pub struct QueryArgs {
    /// Box name
    pub name: String,

    /// Query text
    pub query: String,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Box name
    pub name: String,

    /// Query text
    pub query: String,

    /// Maximum number of hits (defaults to the configured value)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct CompactArgs {
    /// Box name
    pub name: String,

    /// Compact even when the history is under the token threshold
    #[arg(long)]
    pub force: bool,

    /// Override the number of recent messages kept
    #[arg(long)]
    pub keep_recent: Option<usize>,
}
