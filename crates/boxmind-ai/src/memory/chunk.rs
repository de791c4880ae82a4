//! Long-term memory chunk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of conversation content a chunk was extracted from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChunkKind {
    ToolResult,
    ToolUse,
    AssistantText,
    UserInput,
}

impl ChunkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::ToolResult => "tool_result",
            ChunkKind::ToolUse => "tool_use",
            ChunkKind::AssistantText => "assistant_text",
            ChunkKind::UserInput => "user_input",
        }
    }
}

impl fmt::Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled, typed, time-stamped span of retired conversation text.
///
/// Serialized as one element of the `memory.json` array; `timestamp` is epoch
/// milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryChunk {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: ChunkKind,
    /// Originating tool name, or `user` / `assistant`.
    pub source: String,
    pub label: String,
    pub content: String,
    /// Tokens computed once at insertion.
    pub tokens: Vec<String>,
}
