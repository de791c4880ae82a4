//! Host-facing facade over compaction and long-term memory.
//!
//! One engine per session: it owns the session's memory store and drives the
//! per-turn flow (recall before the model call, record after it, compress when
//! the history grows).

use crate::config::ContextConfig;
use crate::llm::{Message, Summarizer};
use crate::memory::{CompressionResult, MemoryStore, compress_history, format_rag_context};
use crate::session::SessionWorkspace;

/// Context continuity engine for a single session.
pub struct ContextEngine {
    config: ContextConfig,
    session: SessionWorkspace,
    memory: MemoryStore,
}

impl ContextEngine {
    /// Create an engine and load the session's memory store.
    pub fn new(session: SessionWorkspace, config: ContextConfig) -> Self {
        let mut memory = MemoryStore::new(session.memory_path());
        memory.load();
        tracing::debug!(
            box_name = %session.name(),
            chunks = memory.len(),
            "Context engine ready"
        );
        Self {
            config,
            session,
            memory,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionWorkspace {
        &self.session
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut MemoryStore {
        &mut self.memory
    }

    /// Retrieved-context block for `user_input`, or an empty string.
    pub fn recall(&mut self, user_input: &str) -> String {
        let hits = self
            .memory
            .search(user_input, self.config.max_search_results);
        format_rag_context(&hits, self.config.rag_max_chars)
    }

    /// `base` with the retrieved context for `user_input` appended.
    pub fn system_prompt(&mut self, base: &str, user_input: &str) -> String {
        let rag = self.recall(user_input);
        if rag.is_empty() {
            return base.to_string();
        }
        format!("{}\n\n{}", base.trim_end(), rag)
    }

    /// Index the messages produced by a turn and persist the store.
    ///
    /// Returns the number of chunks stored. A failed save is logged.
    pub fn record(&mut self, new_messages: &[Message]) -> usize {
        let added = self.memory.index_messages(new_messages);
        if added > 0
            && let Err(err) = self.memory.save()
        {
            tracing::warn!(error = %err, "Failed to persist memory after turn");
        }
        added
    }

    /// Compact `messages` if they are over budget.
    pub async fn compress(
        &mut self,
        messages: Vec<Message>,
        summarizer: &dyn Summarizer,
    ) -> CompressionResult {
        compress_history(
            messages,
            &self.session,
            &self.config.compression(),
            summarizer,
            Some(&mut self.memory),
        )
        .await
    }
}
