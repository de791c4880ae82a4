use std::collections::BTreeMap;

use anyhow::Result;
use boxmind_ai::estimate_tokens;
use serde_json::json;

use super::CommandContext;
use crate::cli::BoxArgs;
use crate::output::json::print_json;

pub fn run(ctx: &CommandContext, args: BoxArgs) -> Result<()> {
    let engine = ctx.engine(&args.name)?;
    let history = engine.session().load_history();
    let tokens = estimate_tokens(&history);

    let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
    for chunk in engine.memory().chunks() {
        *by_kind.entry(chunk.kind.as_str()).or_default() += 1;
    }

    if ctx.format.is_json() {
        return print_json(&json!({
            "box": args.name,
            "chunks": engine.memory().len(),
            "chunks_by_type": by_kind,
            "history_messages": history.len(),
            "history_tokens": tokens,
            "compression_threshold": ctx.config.compression_threshold,
        }));
    }

    println!("Box:              {}", args.name);
    println!("Memory chunks:    {}", engine.memory().len());
    for (kind, count) in &by_kind {
        println!("  {kind:<16}{count}");
    }
    println!("History messages: {}", history.len());
    println!(
        "History tokens:   ~{} (threshold {})",
        tokens, ctx.config.compression_threshold
    );
    Ok(())
}
