//! Deterministic mock summarizer for tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{Duration, sleep};

use super::{SummaryRequest, Summarizer};
use crate::error::{ContextError, Result};

/// Scripted outcome of one summarization call.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Return this summary text.
    Text(String),
    /// Fail with a summarizer error.
    Error(String),
    /// Fail like a timed-out transport after a delay.
    Timeout(u64),
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        MockStep::Text(content.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockStep::Error(message.into())
    }
}

/// A mock summarizer driven by scripted steps.
///
/// Once the script is exhausted every call returns `"mock summary"`. Every call,
/// scripted or not, is counted and its request recorded.
#[derive(Debug, Clone, Default)]
pub struct MockSummarizer {
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<SummaryRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<MockStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            ..Self::default()
        }
    }

    /// Number of `summarize` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<SummaryRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    async fn summarize(&self, request: SummaryRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request);

        let step = self.script.lock().await.pop_front();
        match step {
            None => Ok("mock summary".to_string()),
            Some(MockStep::Text(text)) => Ok(text),
            Some(MockStep::Error(message)) => Err(ContextError::Summarizer(message)),
            Some(MockStep::Timeout(delay_ms)) => {
                sleep(Duration::from_millis(delay_ms)).await;
                Err(ContextError::Summarizer("mock timeout".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SummaryRequest {
        SummaryRequest::new("mock-model", "system", "transcript", 128)
    }

    #[tokio::test]
    async fn test_returns_scripted_steps_in_order() {
        let mock = MockSummarizer::from_steps(vec![MockStep::text("first"), MockStep::error("down")]);

        assert_eq!(mock.summarize(request()).await.unwrap(), "first");
        assert!(mock.summarize(request()).await.is_err());
        assert_eq!(mock.summarize(request()).await.unwrap(), "mock summary");
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_records_requests() {
        let mock = MockSummarizer::new();
        mock.summarize(request()).await.unwrap();

        let requests = mock.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "mock-model");
        assert_eq!(requests[0].messages.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_step_fails() {
        let mock = MockSummarizer::from_steps(vec![MockStep::Timeout(1)]);
        let err = mock.summarize(request()).await.unwrap_err();
        assert!(err.to_string().contains("timeout"));
    }
}
