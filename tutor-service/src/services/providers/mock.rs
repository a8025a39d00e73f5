//! Mock provider implementation for testing and offline runs.

use super::{FinishReason, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Echo the prompt back.
    Echo,
    /// Always answer with this text.
    Text(String),
    /// Produce no text at all.
    Empty,
    /// Fail every call with this error.
    Fail(ProviderError),
}

/// Mock text provider that records every prompt it receives.
pub struct MockTextProvider {
    reply: MockReply,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts().len()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let text = match &self.reply {
            MockReply::Echo => Some(prompt.to_string()),
            MockReply::Text(text) => Some(text.clone()),
            MockReply::Empty => None,
            MockReply::Fail(err) => return Err(err.clone()),
        };

        Ok(ProviderResponse {
            output_tokens: text.as_ref().map_or(0, |t| t.len() as i32 / 4),
            text,
            input_tokens: prompt.len() as i32 / 4,
            finish_reason: FinishReason::Complete,
        })
    }
}
