use std::collections::VecDeque;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::errors::TriageError;
use super::provider::LLMProvider;
use super::types::LLMResponse;

/// Replays canned replies in order and records every prompt it receives.
pub(crate) struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
    context_length: usize,
}

impl ScriptedProvider {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
            context_length: 4096,
        }
    }

    pub fn with_context_length(mut self, context_length: usize) -> Self {
        self.context_length = context_length;
        self
    }

    /// Queue a transport failure as the next reply.
    pub fn push_error(&self, message: &str) {
        self.replies.lock().unwrap().push_back(Err(message.to_string()));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, prompt: &str, _system: Option<&str>) -> Result<LLMResponse, TriageError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(LLMResponse::text(text, "scripted")),
            Some(Err(message)) => Err(TriageError::LLMApi(message)),
            None => Err(TriageError::LLMApi("script exhausted".into())),
        }
    }

    fn context_length(&self) -> usize { self.context_length }
    fn provider_name(&self) -> &str { "scripted" }
    fn model_name(&self) -> &str { "scripted" }
}
