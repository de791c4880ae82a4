//! Conversation message types.
//!
//! These mirror the Messages API shapes exactly so a history file written by the
//! host round-trips through this crate without loss:
//!
//! ```json
//! {"role": "user", "content": "plain text"}
//! {"role": "assistant", "content": [
//!     {"type": "text", "text": "Scanning..."},
//!     {"type": "tool_use", "id": "toolu_1", "name": "exec", "input": {"command": "nmap"}}
//! ]}
//! {"role": "user", "content": [
//!     {"type": "tool_result", "tool_use_id": "toolu_1", "content": "22/tcp open ssh"}
//! ]}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chat message role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Upper-case tag used in transcripts.
    pub fn tag(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Assistant => "ASSISTANT",
        }
    }
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

/// Message body: either a bare string or a list of content blocks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single content block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: ToolResultContent,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
    },
}

/// Body of a `tool_result` block.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ToolResultContent {
    Text(String),
    Parts(Vec<TextPart>),
}

/// One text segment of a multi-part tool result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextPart {
    #[serde(rename = "type", default = "text_part_kind")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

fn text_part_kind() -> String {
    "text".to_string()
}

impl TextPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: text_part_kind(),
            text: text.into(),
        }
    }
}

impl Message {
    /// Create a user message with string content
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create an assistant message with string content
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create a message from content blocks
    pub fn with_blocks(role: Role, blocks: Vec<ContentBlock>) -> Self {
        Self {
            role,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Content blocks, empty for string content.
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Blocks(blocks) => blocks,
            MessageContent::Text(_) => &[],
        }
    }
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        ContentBlock::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        ContentBlock::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: ToolResultContent::Text(content.into()),
            is_error: None,
        }
    }
}

/// Render a tool input the way it is sent on the wire: strings as-is,
/// everything else as compact JSON.
pub(crate) fn input_as_text(input: &Value) -> String {
    match input {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ToolResultContent {
    /// Flatten to a single string, joining parts with newlines.
    pub fn flatten(&self) -> String {
        match self {
            ToolResultContent::Text(text) => text.clone(),
            ToolResultContent::Parts(parts) => parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Character count as seen by the size estimator (parts are not joined).
    pub(crate) fn char_count(&self) -> usize {
        match self {
            ToolResultContent::Text(text) => text.chars().count(),
            ToolResultContent::Parts(parts) => parts.iter().map(|p| p.text.chars().count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_content_round_trips() {
        let raw = json!({"role": "user", "content": "hello"});
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(msg, Message::user("hello"));
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_block_content_round_trips() {
        let raw = json!({
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Running a scan"},
                {"type": "tool_use", "id": "toolu_1", "name": "exec", "input": {"command": "nmap -sV 10.10.10.5"}}
            ]
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.blocks().len(), 2);
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_tool_result_parts_parse_and_flatten() {
        let raw = json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": "toolu_1",
                "content": [{"type": "text", "text": "line one"}, {"type": "text", "text": "line two"}]
            }]
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        let ContentBlock::ToolResult { content, .. } = &msg.blocks()[0] else {
            panic!("expected tool_result block");
        };
        assert_eq!(content.flatten(), "line one\nline two");
        assert_eq!(content.char_count(), 16);
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_is_error_flag_preserved() {
        let raw = json!({
            "role": "user",
            "content": [{"type": "tool_result", "tool_use_id": "t", "content": "boom", "is_error": true}]
        });
        let msg: Message = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&msg).unwrap(), raw);
    }

    #[test]
    fn test_input_as_text_keeps_strings_raw() {
        assert_eq!(input_as_text(&json!("ls -la")), "ls -la");
        assert_eq!(input_as_text(&json!({"a": 1})), r#"{"a":1}"#);
    }
}
