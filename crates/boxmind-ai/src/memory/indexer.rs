//! Turning conversation messages into memory chunks.

use std::collections::HashMap;

use super::chunk::ChunkKind;
use super::store::MemoryStore;
use crate::llm::{ContentBlock, Message, MessageContent, Role, input_as_text};

/// Assistant text blocks at or below this many characters are skipped.
const MIN_ASSISTANT_TEXT_CHARS: usize = 50;
/// Tool results at or below this many characters are skipped.
const MIN_TOOL_RESULT_CHARS: usize = 30;
const FALLBACK_TOOL_SOURCE: &str = "tool";
const UNKNOWN_TOOL_NAME: &str = "unknown";

/// A chunk about to be offered to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkCandidate {
    pub kind: ChunkKind,
    pub source: String,
    pub label: String,
    pub content: String,
}

impl ChunkCandidate {
    fn new(kind: ChunkKind, source: impl Into<String>, label: impl Into<String>, content: String) -> Self {
        Self {
            kind,
            source: source.into(),
            label: label.into(),
            content,
        }
    }
}

/// Classify messages into chunk candidates, in message order.
///
/// Tool results are attributed to the tool whose `tool_use` block in an earlier
/// assistant message carries the same id. The `id -> name` map is filled as
/// messages are walked, so attribution costs one lookup per result.
pub fn extract_candidates(messages: &[Message]) -> Vec<ChunkCandidate> {
    let mut tool_names: HashMap<&str, &str> = HashMap::new();
    let mut candidates = Vec::new();

    for msg in messages {
        let blocks = match &msg.content {
            MessageContent::Text(text) => {
                candidates.push(match msg.role {
                    Role::User => ChunkCandidate::new(ChunkKind::UserInput, "user", "User input", text.clone()),
                    Role::Assistant => ChunkCandidate::new(
                        ChunkKind::AssistantText,
                        "assistant",
                        "Assistant response",
                        text.clone(),
                    ),
                });
                continue;
            }
            MessageContent::Blocks(blocks) => blocks,
        };

        for block in blocks {
            match block {
                ContentBlock::Text { text } => {
                    if msg.role == Role::Assistant && text.chars().count() > MIN_ASSISTANT_TEXT_CHARS {
                        candidates.push(ChunkCandidate::new(
                            ChunkKind::AssistantText,
                            "assistant",
                            "Analysis",
                            text.clone(),
                        ));
                    }
                }
                ContentBlock::ToolUse { name, input, .. } => {
                    let source = if name.is_empty() { UNKNOWN_TOOL_NAME } else { name.as_str() };
                    candidates.push(ChunkCandidate::new(
                        ChunkKind::ToolUse,
                        source,
                        format!("Tool: {name}"),
                        input_as_text(input),
                    ));
                }
                ContentBlock::ToolResult { tool_use_id, content, .. } => {
                    let text = content.flatten();
                    if text.chars().count() > MIN_TOOL_RESULT_CHARS {
                        let source = tool_names
                            .get(tool_use_id.as_str())
                            .copied()
                            .unwrap_or(FALLBACK_TOOL_SOURCE);
                        candidates.push(ChunkCandidate::new(
                            ChunkKind::ToolResult,
                            source,
                            format!("Result: {source}"),
                            text,
                        ));
                    }
                }
            }
        }

        // Only earlier assistant messages resolve tool results.
        if msg.role == Role::Assistant {
            for block in blocks {
                if let ContentBlock::ToolUse { id, name, .. } = block
                    && !name.is_empty()
                {
                    tool_names.insert(id.as_str(), name.as_str());
                }
            }
        }
    }

    candidates
}

impl MemoryStore {
    /// Index messages; returns how many chunks were actually stored.
    pub fn index_messages(&mut self, messages: &[Message]) -> usize {
        let stored = extract_candidates(messages)
            .into_iter()
            .filter(|c| self.add_chunk(c.kind, c.source.as_str(), c.label.as_str(), &c.content))
            .count();
        tracing::debug!(messages = messages.len(), stored, "Indexed messages into memory");
        stored
    }
}
