//! Retrieved-context block for the system prompt.

use chrono::Local;

use super::chunk::MemoryChunk;

/// Default character budget for the retrieved-context block.
pub const DEFAULT_RAG_MAX_CHARS: usize = 6000;

const RAG_HEADER: &str = "## Retrieved context (long-term memory)\n";

/// Render ranked chunks under a header, in the given order.
///
/// Chunks are added whole until the next one would push the body past
/// `max_chars`; nothing is emitted partially. The header is always present
/// when there is at least one chunk. An empty input renders as `""`.
pub fn format_rag_context(chunks: &[MemoryChunk], max_chars: usize) -> String {
    if chunks.is_empty() {
        return String::new();
    }

    let mut out = String::from(RAG_HEADER);
    let mut used = RAG_HEADER.chars().count();

    for chunk in chunks {
        let entry = format!(
            "\n### [{}] {} ({})\n{}\n",
            chunk.kind,
            chunk.label,
            chunk.timestamp.with_timezone(&Local).format("%H:%M:%S"),
            chunk.content
        );
        let entry_chars = entry.chars().count();
        if used + entry_chars > max_chars {
            break;
        }
        out.push_str(&entry);
        used += entry_chars;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::ChunkKind;
    use chrono::Utc;

    fn chunk(label: &str, content: &str) -> MemoryChunk {
        MemoryChunk {
            id: "abcd1234".to_string(),
            timestamp: Utc::now(),
            kind: ChunkKind::ToolResult,
            source: "exec".to_string(),
            label: label.to_string(),
            content: content.to_string(),
            tokens: vec![],
        }
    }

    #[test]
    fn test_empty_input_renders_empty() {
        assert_eq!(format_rag_context(&[], DEFAULT_RAG_MAX_CHARS), "");
    }

    #[test]
    fn test_zero_budget_renders_header_only() {
        let out = format_rag_context(&[chunk("Result: exec", "22/tcp open ssh")], 0);
        assert_eq!(out, RAG_HEADER);
    }

    #[test]
    fn test_renders_chunks_in_order() {
        let out = format_rag_context(
            &[chunk("Result: nmap", "22/tcp open ssh"), chunk("Result: ffuf", "/admin 301")],
            DEFAULT_RAG_MAX_CHARS,
        );
        assert!(out.starts_with(RAG_HEADER));
        let nmap = out.find("### [tool_result] Result: nmap (").unwrap();
        let ffuf = out.find("### [tool_result] Result: ffuf (").unwrap();
        assert!(nmap < ffuf);
        assert!(out.contains("22/tcp open ssh\n"));
        assert!(out.contains("/admin 301\n"));
    }

    #[test]
    fn test_stops_at_first_chunk_over_budget() {
        let chunks = vec![
            chunk("first", &"a".repeat(100)),
            chunk("second", &"b".repeat(5000)),
            chunk("third", &"c".repeat(10)),
        ];
        let out = format_rag_context(&chunks, 1000);
        assert!(out.contains("first"));
        assert!(!out.contains("second"));
        assert!(!out.contains("third"));
        assert!(out.chars().count() <= 1000);
    }
}
