//! Summarization seam used by history compaction.

use async_trait::async_trait;

use super::Message;
use crate::error::Result;

/// A single summarization call.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub model: String,
    pub system_prompt: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

impl SummaryRequest {
    /// Create a request carrying one user message.
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        transcript: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            messages: vec![Message::user(transcript)],
            max_tokens,
        }
    }
}

/// Produces the text of a model reply for a summarization request.
///
/// Implementations own transport, retries and deadlines; compaction awaits the
/// call to completion and treats any error as "summary unavailable".
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Return the first text segment of the model's reply.
    async fn summarize(&self, request: SummaryRequest) -> Result<String>;

    /// Whether a model can be reached at all. When `false`, compaction
    /// truncates without calling [`summarize`](Self::summarize).
    fn is_available(&self) -> bool {
        true
    }
}
