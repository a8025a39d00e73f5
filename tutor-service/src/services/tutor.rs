//! Question answering: validate the query, render the prompt, call the provider.

use super::metrics::record_provider_call;
use super::prompt::build_prompt;
use super::providers::{ProviderError, TextProvider};
use crate::dtos::AskRequest;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Subject and chapter used when the caller leaves them out.
pub const DEFAULT_TOPIC: &str = "General";

/// Answer returned when the provider produces no text.
pub const FALLBACK_ANSWER: &str = "I could not generate an answer.";

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Gemini error: {0}")]
    Provider(#[from] ProviderError),
}

impl From<TutorError> for AppError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::InvalidInput(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
            err @ TutorError::Provider(_) => AppError::UpstreamError(err.to_string()),
        }
    }
}

/// A validated student question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub subject: String,
    pub chapter: String,
    pub question: String,
}

impl TryFrom<AskRequest> for Query {
    type Error = TutorError;

    fn try_from(request: AskRequest) -> Result<Self, Self::Error> {
        let question = request.question.as_deref().unwrap_or_default().trim();
        if question.is_empty() {
            return Err(TutorError::InvalidInput("Question is required".to_string()));
        }

        Ok(Query {
            subject: topic_or_default(request.subject.as_deref()),
            chapter: topic_or_default(request.chapter.as_deref()),
            question: question.to_string(),
        })
    }
}

fn topic_or_default(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => DEFAULT_TOPIC.to_string(),
    }
}

/// Stateless tutor backed by a shared, read-only provider.
#[derive(Clone)]
pub struct TutorService {
    provider: Arc<dyn TextProvider>,
}

impl TutorService {
    pub fn new(provider: Arc<dyn TextProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn TextProvider> {
        &self.provider
    }

    /// Ask the provider one question. Exactly one provider call per invocation.
    pub async fn ask(&self, query: &Query) -> Result<String, TutorError> {
        let prompt = build_prompt(query);

        let start = Instant::now();
        let result = self.provider.generate(&prompt).await;
        record_provider_call(
            self.provider.name(),
            self.provider.model(),
            result.as_ref().map(|_| ()).map_err(ProviderError::kind),
            start.elapsed(),
        );

        let response = result.map_err(|e| {
            tracing::error!(
                provider = self.provider.name(),
                model = %self.provider.model(),
                error = %e,
                "Provider call failed"
            );
            e
        })?;

        tracing::info!(
            provider = self.provider.name(),
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Provider call completed"
        );

        Ok(response
            .text
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| FALLBACK_ANSWER.to_string()))
    }
}
