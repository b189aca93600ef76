use async_trait::async_trait;
use crate::errors::{RetryConfig, TriageError, with_retry};
use super::types::LLMResponse;
use tracing::debug;

/// The interpretation service: one prompt in, free-form text out.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Free-form text completion
    async fn complete(
        &self,
        prompt: &str,
        system: Option<&str>,
    ) -> Result<LLMResponse, TriageError>;

    /// Declared context window, in tokens. Capture budgets are derived from it.
    fn context_length(&self) -> usize;

    /// Provider name for logging
    fn provider_name(&self) -> &str;

    /// Model identifier
    fn model_name(&self) -> &str;
}

/// Map a failed request onto the retryable transport errors.
pub(crate) fn request_error(service: &str, e: reqwest::Error) -> TriageError {
    if e.is_timeout() {
        TriageError::Timeout(format!("{} request timed out: {}", service, e))
    } else {
        TriageError::Network(format!("{} request failed: {}", service, e))
    }
}

/// Send one prompt with transport-level retries and return the raw reply text.
pub async fn ask(
    llm: &dyn LLMProvider,
    operation: &str,
    prompt: &str,
    system: Option<&str>,
    retry: &RetryConfig,
) -> Result<String, TriageError> {
    let response = with_retry(operation, retry, || llm.complete(prompt, system)).await?;
    debug!(
        operation,
        provider = llm.provider_name(),
        model = %response.model,
        input_tokens = response.input_tokens,
        output_tokens = response.output_tokens,
        "Interpretation service replied"
    );
    Ok(response.content)
}
