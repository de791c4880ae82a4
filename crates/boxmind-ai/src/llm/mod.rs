//! LLM module - conversation wire types and the summarization seam

mod message;
mod mock_summarizer;
mod summarizer;

pub(crate) use message::input_as_text;
pub use message::{ContentBlock, Message, MessageContent, Role, TextPart, ToolResultContent};
pub use mock_summarizer::{MockStep, MockSummarizer};
pub use summarizer::{SummaryRequest, Summarizer};
