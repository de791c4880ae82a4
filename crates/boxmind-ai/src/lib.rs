//! Boxmind AI - context continuity for long-running agent sessions
//!
//! This crate provides:
//! - History compaction (model summary or mechanical truncation)
//! - Long-term memory: a TF-IDF index over retired conversation chunks
//! - Retrieval of relevant chunks into the system prompt
//! - Per-engagement session workspaces and configuration

pub mod config;
pub mod engine;
pub mod error;
pub mod llm;
pub mod memory;
pub mod session;
pub mod text_utils;
pub mod tokenizer;

// Re-export commonly used types
pub use config::ContextConfig;
pub use engine::ContextEngine;
pub use error::{ContextError, Result};
pub use llm::{
    ContentBlock, Message, MessageContent, MockStep, MockSummarizer, Role, SummaryRequest,
    Summarizer, TextPart, ToolResultContent,
};
pub use memory::{
    ChunkKind, CompressionConfig, CompressionOutcome, CompressionResult, MemoryChunk, MemoryStore,
    ScoredChunk, SessionContext, compress_history, estimate_tokens, format_rag_context,
    serialize_for_summary,
};
pub use session::SessionWorkspace;
pub use tokenizer::tokenize;
