use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use super::CommandContext;
use crate::cli::QueryArgs;
use crate::output::json::print_json;

pub fn run(ctx: &CommandContext, args: QueryArgs) -> Result<()> {
    let mut engine = ctx.engine(&args.name)?;
    let block = engine.recall(&args.query);

    if ctx.format.is_json() {
        return print_json(&json!({ "query": args.query, "context": block }));
    }

    if block.is_empty() {
        eprintln!("{}", "No relevant memory.".dimmed());
    } else {
        print!("{block}");
    }
    Ok(())
}
