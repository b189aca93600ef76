use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::TriageError;
use super::provider::{request_error, LLMProvider};
use super::types::LLMResponse;

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    context_length: usize,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>, context_length: usize) -> Self {
        Self::with_base_url(api_key, model, "https://api.openai.com/v1", context_length)
    }

    /// Any endpoint speaking the chat-completions protocol.
    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str, context_length: usize) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or("gpt-4o").to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            context_length,
        }
    }
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, TriageError> {
        let mut messages = Vec::new();
        if let Some(sys) = system {
            messages.push(json!({"role": "system", "content": sys}));
        }
        messages.push(json!({"role": "user", "content": prompt}));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": 4096,
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("OpenAI", e))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(TriageError::RateLimit("OpenAI rate limit".into()));
        }
        if status.as_u16() == 401 {
            return Err(TriageError::Authentication("Invalid OpenAI API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| TriageError::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        if let Some(error) = data.get("error") {
            return Err(TriageError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
        }

        let content = data["choices"][0]["message"]["content"].as_str()
            .ok_or_else(|| TriageError::LLMApi("No content in OpenAI response".into()))?
            .to_string();
        let input_tokens = data["usage"]["prompt_tokens"].as_u64();
        let output_tokens = data["usage"]["completion_tokens"].as_u64();

        Ok(LLMResponse {
            content,
            input_tokens,
            output_tokens,
            model: self.model.clone(),
        })
    }

    fn context_length(&self) -> usize { self.context_length }
    fn provider_name(&self) -> &str { "openai" }
    fn model_name(&self) -> &str { &self.model }
}
