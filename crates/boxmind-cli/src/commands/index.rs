use std::collections::HashSet;

use anyhow::{Context, Result};
use boxmind_ai::memory::{ChunkKind, MAX_CONTENT_CHARS, extract_candidates};
use boxmind_ai::text_utils::head_chars;
use serde_json::json;

use super::CommandContext;
use crate::cli::BoxArgs;
use crate::output::json::print_json;

pub fn run(ctx: &CommandContext, args: BoxArgs) -> Result<()> {
    let mut engine = ctx.engine(&args.name)?;
    let history = engine.session().load_history();

    // The store only checks its most recent chunks for near-duplicates, so a
    // full re-index of the history would re-add everything older than that.
    let mut seen: HashSet<(ChunkKind, String)> = engine
        .memory()
        .chunks()
        .map(|c| (c.kind, c.content.clone()))
        .collect();

    let memory = engine.memory_mut();
    let mut added = 0;
    for candidate in extract_candidates(&history) {
        let key = (
            candidate.kind,
            head_chars(&candidate.content, MAX_CONTENT_CHARS).to_string(),
        );
        if seen.contains(&key) {
            continue;
        }
        if memory.add_chunk(
            candidate.kind,
            candidate.source,
            candidate.label,
            &candidate.content,
        ) {
            seen.insert(key);
            added += 1;
        }
    }
    if added > 0 {
        memory.save().context("Failed to save memory store")?;
    }
    tracing::debug!(messages = history.len(), added, "Indexed session history");
    let total = engine.memory().len();

    if ctx.format.is_json() {
        return print_json(&json!({
            "box": args.name,
            "messages": history.len(),
            "added": added,
            "chunks": total,
        }));
    }

    println!(
        "Indexed {} messages from {}: {} new chunks ({} stored)",
        history.len(),
        args.name,
        added,
        total
    );
    Ok(())
}
