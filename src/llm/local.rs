use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::TriageError;
use super::provider::{request_error, LLMProvider};
use super::types::LLMResponse;

pub struct LocalProvider {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
    context_length: usize,
}

impl LocalProvider {
    pub fn new(base_url: Option<&str>, model: Option<&str>, api_key: &str, context_length: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.unwrap_or("http://localhost:11434/v1").trim_end_matches('/').to_string(),
            model: model.unwrap_or("qwen2.5-coder:7b").to_string(),
            api_key: api_key.to_string(),
            context_length,
        }
    }
}

#[async_trait]
impl LLMProvider for LocalProvider {
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
            // Ollama reads the window size from here; other servers ignore it.
            "options": { "num_ctx": self.context_length },
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| request_error("Local LLM", e))?;

        let data: Value = resp.json().await
            .map_err(|e| TriageError::LLMApi(format!("Parse error: {}", e)))?;

        let content = data["choices"][0]["message"]["content"].as_str().unwrap_or("").to_string();

        Ok(LLMResponse { content, input_tokens: None, output_tokens: None, model: self.model.clone() })
    }

    fn context_length(&self) -> usize { self.context_length }
    fn provider_name(&self) -> &str { "local" }
    fn model_name(&self) -> &str { &self.model }
}
