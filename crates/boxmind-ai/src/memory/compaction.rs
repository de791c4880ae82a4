//! History compaction: keeps the live message list bounded.
//!
//! When the history is too large (estimated tokens over the threshold, or more
//! than 50 messages) everything but the most recent `keep_recent` messages is
//! retired. Retired messages are indexed into long-term memory first, then
//! replaced by a user/assistant bridge pair carrying either a model-written
//! summary or a note that they were dropped.
//!
//! Histories over 100 messages skip the summarization call entirely and go
//! straight to truncation.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::estimate::estimate_tokens;
use super::store::MemoryStore;
use super::transcript::serialize_for_summary;
use crate::config::ContextConfig;
use crate::error::{ContextError, Result};
use crate::llm::{ContentBlock, Message, MessageContent, SummaryRequest, Summarizer, ToolResultContent};
use crate::text_utils::elide_middle;

pub const COMPACTION_PROMPT: &str = include_str!("templates/compaction_prompt.md");

/// Histories longer than this are compacted regardless of size.
pub const MAX_MESSAGES_BEFORE_COMPRESSION: usize = 50;
/// Histories longer than this are truncated without a summarization call.
pub const SUMMARY_BYPASS_MESSAGES: usize = 100;

const TOOL_RESULT_MAX_CHARS: usize = 1200;
const TOOL_RESULT_HEAD_CHARS: usize = 800;
const TOOL_RESULT_TAIL_CHARS: usize = 400;

const SUMMARY_ACK: &str =
    "Understood. I have integrated the summary of our previous conversation and will continue with the full context.";
const TRUNCATION_ACK: &str = "Understood. I will rely on notes.md for context.";

/// Compaction configuration.
#[derive(Debug, Clone)]
pub struct CompressionConfig {
    /// Estimated tokens at which compaction triggers (default: 40_000).
    pub token_threshold: usize,
    /// Number of most recent messages kept verbatim (default: 10).
    pub keep_recent: usize,
    /// Model passed to the summarizer.
    pub model: String,
    /// Maximum tokens for the generated summary (default: 4_096).
    pub max_summary_tokens: u32,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        ContextConfig::default().compression()
    }
}

/// The session a history belongs to.
pub trait SessionContext: Send + Sync {
    /// Short name of the engagement (machine name).
    fn box_name(&self) -> &str;
    /// Target address.
    fn target(&self) -> &str;
    /// Directory receiving pre-compaction backups.
    fn workspace_dir(&self) -> &Path;

    /// Backup file for a compaction started at `millis` (Unix epoch).
    fn backup_path(&self, millis: i64) -> PathBuf {
        self.workspace_dir().join(format!("history-backup-{millis}.json"))
    }
}

/// What compaction did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionOutcome {
    /// Below both triggers, or nothing old enough to retire.
    Unchanged,
    /// Retired messages replaced by a model summary.
    Summarized { retired: usize },
    /// Retired messages dropped.
    Truncated { retired: usize },
}

/// Result of a compaction pass.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// New message history.
    pub messages: Vec<Message>,
    pub outcome: CompressionOutcome,
    /// Estimated tokens before compaction.
    pub tokens_before: usize,
    /// Estimated tokens after compaction.
    pub tokens_after: usize,
    /// Chunks stored in long-term memory from the retired messages.
    pub indexed: usize,
    /// Backup file written before compaction, if any.
    pub backup_path: Option<PathBuf>,
}

impl CompressionResult {
    fn unchanged(messages: Vec<Message>, tokens: usize, backup_path: Option<PathBuf>) -> Self {
        Self {
            messages,
            outcome: CompressionOutcome::Unchanged,
            tokens_before: tokens,
            tokens_after: tokens,
            indexed: 0,
            backup_path,
        }
    }

    pub fn compressed(&self) -> bool {
        self.outcome != CompressionOutcome::Unchanged
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}

/// Compact `messages` if they exceed the token threshold or the message ceiling.
///
/// Never fails: backup, indexing and summarization errors are logged, and a
/// failed summary degrades to truncation. When compaction happens the result
/// holds at most `keep_recent + 2` messages; otherwise it holds the input.
pub async fn compress_history(
    mut messages: Vec<Message>,
    session: &dyn SessionContext,
    config: &CompressionConfig,
    summarizer: &dyn Summarizer,
    memory: Option<&mut MemoryStore>,
) -> CompressionResult {
    let tokens_before = estimate_tokens(&messages);
    let total = messages.len();
    if tokens_before < config.token_threshold && total <= MAX_MESSAGES_BEFORE_COMPRESSION {
        return CompressionResult::unchanged(messages, tokens_before, None);
    }

    tracing::info!(
        tokens = tokens_before,
        threshold = config.token_threshold,
        messages = total,
        "History over budget, compacting"
    );

    let backup_path = match write_backup(&messages, session) {
        Ok(path) => {
            tracing::info!(path = %path.display(), "History backup saved");
            Some(path)
        }
        Err(err) => {
            tracing::warn!(error = %err, "History backup failed");
            None
        }
    };

    let split = total.saturating_sub(config.keep_recent);
    if split == 0 {
        return CompressionResult::unchanged(messages, tokens_before, backup_path);
    }

    let mut indexed = 0;
    if let Some(store) = memory {
        indexed = store.index_messages(&messages[..split]);
        if let Err(err) = store.save() {
            tracing::warn!(error = %err, "Failed to persist memory before compaction");
        }
    }

    let kept = clamp_tool_results(messages.split_off(split));
    let retiring = messages;
    let retired = retiring.len();

    let summary = if total > SUMMARY_BYPASS_MESSAGES {
        tracing::info!(messages = total, "Too many messages to summarize, truncating");
        None
    } else if !summarizer.is_available() {
        tracing::debug!("No summarizer available, truncating");
        None
    } else {
        match summarize(&retiring, session, config, summarizer).await {
            Ok(summary) => Some(summary),
            Err(err) => {
                tracing::warn!(error = %err, "Summary failed, truncating history");
                None
            }
        }
    };

    let (bridge, outcome) = match summary {
        Some(summary) => (
            summary_bridge(retired, &summary),
            CompressionOutcome::Summarized { retired },
        ),
        None => (truncation_bridge(retired), CompressionOutcome::Truncated { retired }),
    };

    let mut compacted = Vec::with_capacity(bridge.len() + kept.len());
    compacted.extend(bridge);
    compacted.extend(kept);

    let tokens_after = estimate_tokens(&compacted);
    tracing::info!(
        retired,
        tokens_before,
        tokens_after,
        outcome = ?outcome,
        "History compacted"
    );

    CompressionResult {
        messages: compacted,
        outcome,
        tokens_before,
        tokens_after,
        indexed,
        backup_path,
    }
}

/// Fill the summary instruction for this session.
pub fn summary_instruction(session: &dyn SessionContext) -> String {
    COMPACTION_PROMPT
        .replace("{box}", session.box_name())
        .replace("{target}", session.target())
}

async fn summarize(
    retiring: &[Message],
    session: &dyn SessionContext,
    config: &CompressionConfig,
    summarizer: &dyn Summarizer,
) -> Result<String> {
    let request = SummaryRequest::new(
        config.model.as_str(),
        summary_instruction(session),
        serialize_for_summary(retiring),
        config.max_summary_tokens,
    );

    let summary = summarizer.summarize(request).await?;
    // Never replace real history with nothing.
    if summary.trim().is_empty() {
        return Err(ContextError::EmptySummary(config.model.clone()));
    }
    Ok(summary)
}

fn summary_bridge(retired: usize, summary: &str) -> [Message; 2] {
    [
        Message::user(format!(
            "[Automatic summary of the first {retired} messages of the conversation]\n\n{summary}"
        )),
        Message::assistant(SUMMARY_ACK),
    ]
}

fn truncation_bridge(retired: usize) -> [Message; 2] {
    [
        Message::user(format!(
            "[History truncated: {retired} older messages dropped. Consult notes.md for the full context.]"
        )),
        Message::assistant(TRUNCATION_ACK),
    ]
}

fn write_backup(messages: &[Message], session: &dyn SessionContext) -> Result<PathBuf> {
    let path = session.backup_path(Utc::now().timestamp_millis());
    let json = serde_json::to_string_pretty(messages)?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Clamp every `tool_result` body to 1200 characters.
///
/// Longer bodies keep their first 800 and last 400 characters around an
/// elision marker; multi-part bodies are flattened first. Shorter bodies pass
/// through untouched.
pub fn clamp_tool_results(messages: Vec<Message>) -> Vec<Message> {
    messages
        .into_iter()
        .map(|mut msg| {
            if let MessageContent::Blocks(blocks) = &mut msg.content {
                for block in blocks.iter_mut() {
                    if let ContentBlock::ToolResult { content, .. } = block
                        && content.char_count() > TOOL_RESULT_MAX_CHARS
                    {
                        *content = ToolResultContent::Text(elide_middle(
                            &content.flatten(),
                            TOOL_RESULT_MAX_CHARS,
                            TOOL_RESULT_HEAD_CHARS,
                            TOOL_RESULT_TAIL_CHARS,
                        ));
                    }
                }
            }
            msg
        })
        .collect()
}
