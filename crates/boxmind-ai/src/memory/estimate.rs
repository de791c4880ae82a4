//! Cheap token estimate for a message list.
//!
//! One token per four characters over every text-bearing field. This is a
//! threshold signal for compaction, not a billing-accurate count.

use crate::llm::{ContentBlock, Message, MessageContent, input_as_text};

const CHARS_PER_TOKEN: usize = 4;

/// Characters contributed by one message.
fn message_chars(msg: &Message) -> usize {
    match &msg.content {
        MessageContent::Text(text) => text.chars().count(),
        MessageContent::Blocks(blocks) => blocks.iter().map(block_chars).sum(),
    }
}

fn block_chars(block: &ContentBlock) -> usize {
    match block {
        ContentBlock::Text { text } => text.chars().count(),
        ContentBlock::ToolUse { input, .. } => input_as_text(input).chars().count(),
        ContentBlock::ToolResult { content, .. } => content.char_count(),
    }
}

/// Estimate total tokens for a message list: `ceil(chars / 4)`.
pub fn estimate_tokens(messages: &[Message]) -> usize {
    let chars: usize = messages.iter().map(message_chars).sum();
    chars.div_ceil(CHARS_PER_TOKEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Role, TextPart, ToolResultContent};
    use serde_json::json;

    #[test]
    fn test_empty_list_is_zero() {
        assert_eq!(estimate_tokens(&[]), 0);
    }

    #[test]
    fn test_rounds_up() {
        assert_eq!(estimate_tokens(&[Message::user("a")]), 1);
        assert_eq!(estimate_tokens(&[Message::user("abcd")]), 1);
        assert_eq!(estimate_tokens(&[Message::user("abcde")]), 2);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // 4 chars, 12 bytes
        assert_eq!(estimate_tokens(&[Message::user("你好世界")]), 1);
    }

    #[test]
    fn test_counts_every_block_kind() {
        let input = json!({"command": "id"}); // {"command":"id"} = 16 chars
        let msgs = vec![
            Message::with_blocks(
                Role::Assistant,
                vec![
                    ContentBlock::text("12345678"),
                    ContentBlock::tool_use("t1", "exec", input),
                ],
            ),
            Message::with_blocks(
                Role::User,
                vec![ContentBlock::ToolResult {
                    tool_use_id: "t1".to_string(),
                    content: ToolResultContent::Parts(vec![TextPart::new("uid=0"), TextPart::new("(root)")]),
                    is_error: None,
                }],
            ),
        ];
        // 8 + 16 + 5 + 6 = 35 chars -> 9 tokens
        assert_eq!(estimate_tokens(&msgs), 9);
    }

    #[test]
    fn test_string_tool_input_counted_raw() {
        let msgs = vec![Message::with_blocks(
            Role::Assistant,
            vec![ContentBlock::tool_use("t1", "exec", json!("ls -la"))],
        )];
        assert_eq!(estimate_tokens(&msgs), 2);
    }

    #[test]
    fn test_tool_name_and_ids_not_counted() {
        let msgs = vec![Message::with_blocks(
            Role::Assistant,
            vec![ContentBlock::tool_use("a-very-long-tool-use-id", "a_long_tool_name", json!(""))],
        )];
        assert_eq!(estimate_tokens(&msgs), 0);
    }
}
