//! Context continuity for agent conversations
//!
//! - **Compaction**: bounds the live message list, summarizing or truncating
//!   the retired prefix
//! - **Long-term memory**: TF-IDF index over chunks of retired messages, queried
//!   to pull facts back into the prompt
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Context Continuity Engine                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  messages ──► estimate_tokens ──► compress_history          │
//! │                                     │                       │
//! │                      retiring ──────┼──► index_messages     │
//! │                                     │         │             │
//! │        summary bridge ◄── Summarizer│         ▼             │
//! │        truncation bridge ◄──────────┘    MemoryStore        │
//! │                                          (memory.json)      │
//! │                                               │             │
//! │  user input ──► search ──► format_rag_context ┘             │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod chunk;
mod compaction;
mod estimate;
mod indexer;
mod rag;
mod store;
mod tfidf;
mod transcript;

pub use chunk::{ChunkKind, MemoryChunk};
pub use compaction::{
    COMPACTION_PROMPT, CompressionConfig, CompressionOutcome, CompressionResult,
    MAX_MESSAGES_BEFORE_COMPRESSION, SUMMARY_BYPASS_MESSAGES, SessionContext, clamp_tool_results,
    compress_history, summary_instruction,
};
pub use estimate::estimate_tokens;
pub use indexer::{ChunkCandidate, extract_candidates};
pub use rag::{DEFAULT_RAG_MAX_CHARS, format_rag_context};
pub use store::{
    DEDUP_THRESHOLD, DEDUP_WINDOW, DEFAULT_TOP_K, MAX_CHUNKS, MAX_CONTENT_CHARS, MEMORY_FILE,
    MIN_CHUNK_TOKENS, MIN_RELEVANCE, MemoryStore, ScoredChunk,
};
pub(crate) use store::write_atomic;
pub use tfidf::{IdfTable, SparseVector, cosine_similarity, term_frequency};
pub use transcript::serialize_for_summary;
