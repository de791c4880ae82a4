use anyhow::Result;
use comfy_table::{Cell, Table};

use super::CommandContext;
use crate::cli::SearchArgs;
use crate::output::json::print_json;
use crate::output::table::{preview, print_table};

pub fn run(ctx: &CommandContext, args: SearchArgs) -> Result<()> {
    let mut engine = ctx.engine(&args.name)?;
    let limit = args.limit.unwrap_or(ctx.config.max_search_results);
    let hits = engine.memory_mut().search_scored(&args.query, limit);

    if ctx.format.is_json() {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No matching memory for '{}'", args.query);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Score", "Type", "Label", "Content"]);
    for (rank, hit) in hits.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:.3}", hit.score)),
            Cell::new(hit.chunk.kind),
            Cell::new(&hit.chunk.label),
            Cell::new(preview(&hit.chunk.content)),
        ]);
    }
    print_table(table);
    Ok(())
}
