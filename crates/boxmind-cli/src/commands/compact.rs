use anyhow::{Context, Result};
use async_trait::async_trait;
use boxmind_ai::{CompressionOutcome, ContextEngine, ContextError, Summarizer, SummaryRequest};
use serde_json::json;

use super::CommandContext;
use crate::cli::CompactArgs;
use crate::output::json::print_json;

/// Summarizer for offline use: reports itself unavailable, so compaction
/// truncates.
struct OfflineSummarizer;

#[async_trait]
impl Summarizer for OfflineSummarizer {
    async fn summarize(&self, request: SummaryRequest) -> boxmind_ai::Result<String> {
        Err(ContextError::Summarizer(format!(
            "no model transport available offline for {}",
            request.model
        )))
    }

    fn is_available(&self) -> bool {
        false
    }
}

pub async fn run(ctx: &CommandContext, args: CompactArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if args.force {
        config.compression_threshold = 0;
    }
    if let Some(keep_recent) = args.keep_recent {
        config.compression_keep_recent = keep_recent;
    }

    let mut engine = ContextEngine::new(ctx.session(&args.name)?, config);
    let history = engine.session().load_history();
    let before = history.len();

    let result = engine.compress(history, &OfflineSummarizer).await;
    if result.compressed() {
        engine
            .session()
            .save_history(&result.messages)
            .with_context(|| format!("Failed to write compacted history for {}", args.name))?;
    }

    let retired = match result.outcome {
        CompressionOutcome::Unchanged => 0,
        CompressionOutcome::Summarized { retired } | CompressionOutcome::Truncated { retired } => {
            retired
        }
    };

    if ctx.format.is_json() {
        return print_json(&json!({
            "box": args.name,
            "compacted": result.compressed(),
            "messages_before": before,
            "messages_after": result.messages.len(),
            "retired": retired,
            "tokens_before": result.tokens_before,
            "tokens_after": result.tokens_after,
            "indexed": result.indexed,
            "backup": result.backup_path,
        }));
    }

    if !result.compressed() {
        println!(
            "History of {} is within budget ({} messages, ~{} tokens)",
            args.name, before, result.tokens_before
        );
        return Ok(());
    }

    println!(
        "Compacted {}: {} -> {} messages, ~{} -> ~{} tokens",
        args.name,
        before,
        result.messages.len(),
        result.tokens_before,
        result.tokens_after
    );
    println!("Indexed {} chunks from {} retired messages", result.indexed, retired);
    if let Some(backup) = &result.backup_path {
        println!("Backup: {}", backup.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_summarizer_is_unavailable() {
        let request = SummaryRequest::new("claude-haiku-4-5-20251001", "instr", "transcript", 16);
        let err = OfflineSummarizer.summarize(request).await.unwrap_err();
        assert!(err.to_string().contains("offline"));
        assert!(!OfflineSummarizer.is_available());
    }
}
