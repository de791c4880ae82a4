//! Flat transcript rendering for the summarization call.

use crate::llm::{ContentBlock, Message, MessageContent, input_as_text};
use crate::text_utils::{elide_middle, head_chars, strip_ansi};

const TOOL_INPUT_MAX_CHARS: usize = 3000;
const TOOL_RESULT_MAX_CHARS: usize = 3000;
const TOOL_RESULT_HEAD_CHARS: usize = 1500;
const TOOL_RESULT_TAIL_CHARS: usize = 1500;

/// Render messages as one line per text block, tool call and tool result.
///
/// ANSI escapes are stripped everywhere. Tool inputs keep their first 3000
/// characters; tool results over 3000 characters keep head and tail.
pub fn serialize_for_summary(messages: &[Message]) -> String {
    let mut lines = Vec::new();

    for msg in messages {
        let role = msg.role.tag();
        let blocks = match &msg.content {
            MessageContent::Text(text) => {
                lines.push(format!("[{}] {}", role, strip_ansi(text)));
                continue;
            }
            MessageContent::Blocks(blocks) => blocks,
        };

        for block in blocks {
            match block {
                ContentBlock::Text { text } => {
                    lines.push(format!("[{}] {}", role, strip_ansi(text)));
                }
                ContentBlock::ToolUse { name, input, .. } => {
                    let input = strip_ansi(&input_as_text(input));
                    lines.push(format!(
                        "[TOOL_USE: {}] {}",
                        name,
                        head_chars(&input, TOOL_INPUT_MAX_CHARS)
                    ));
                }
                ContentBlock::ToolResult { content, .. } => {
                    let text = strip_ansi(&content.flatten());
                    let text = elide_middle(
                        &text,
                        TOOL_RESULT_MAX_CHARS,
                        TOOL_RESULT_HEAD_CHARS,
                        TOOL_RESULT_TAIL_CHARS,
                    );
                    lines.push(format!("[TOOL_RESULT] {}", text));
                }
            }
        }
    }

    lines.join("\n")
}
