pub mod commands;
pub mod run;
pub mod summarize;
pub mod tools;

use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use crate::config::{self, resolve_api_key, TriageConfig};
use crate::errors::TriageError;
use crate::llm::{api_key_env_var, create_provider, LLMProvider, DEFAULT_CONTEXT_LENGTH};

pub use commands::{Cli, Commands};

pub const DEFAULT_PROVIDER: &str = "anthropic";

async fn load_config(path: Option<&str>) -> Result<TriageConfig, TriageError> {
    match path {
        Some(path) => config::parse_config(&PathBuf::from(path)).await,
        None => Ok(TriageConfig::default()),
    }
}

/// Flags win over the config file; the file wins over built-in defaults.
fn build_provider(args: &commands::LlmArgs, file: &TriageConfig) -> Result<Arc<dyn LLMProvider>, TriageError> {
    let llm = file.llm();
    let provider = args.provider.clone()
        .or(llm.provider)
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());
    let model = args.model.clone().or(llm.model);
    let base_url = args.base_url.clone().or(llm.base_url);
    let context_length = args.context_length
        .or(llm.context_length)
        .unwrap_or(DEFAULT_CONTEXT_LENGTH);
    if context_length <= crate::capture::PROMPT_SAFETY_MARGIN {
        return Err(TriageError::Config(format!("context length {} leaves no room for tool output", context_length)));
    }

    let api_key = resolve_api_key(args.api_key.as_deref(), llm.api_key.as_deref(), &provider);
    if api_key.is_empty() {
        if let Some(var) = api_key_env_var(&provider) {
            return Err(TriageError::Authentication(format!(
                "no API key for provider '{}': pass --api-key or set {}",
                provider, var
            )));
        }
    }

    debug!(provider = %provider, model = ?model, context_length, "Creating interpretation provider");
    let boxed = create_provider(&provider, &api_key, model.as_deref(), base_url.as_deref(), context_length)?;
    Ok(Arc::from(boxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::LlmArgs;

    #[test]
    fn test_local_provider_needs_no_key() {
        let args = LlmArgs { provider: Some("local".into()), ..Default::default() };
        let llm = build_provider(&args, &TriageConfig::default()).unwrap();
        assert_eq!(llm.provider_name(), "local");
        assert_eq!(llm.context_length(), DEFAULT_CONTEXT_LENGTH);
    }

    #[test]
    fn test_flag_overrides_file_context_length() {
        let file = config::parse_config_str("llm:\n  provider: local\n  context_length: 4096\n").unwrap();
        let from_file = build_provider(&LlmArgs::default(), &file).unwrap();
        assert_eq!(from_file.context_length(), 4096);

        let args = LlmArgs { context_length: Some(32000), ..Default::default() };
        assert_eq!(build_provider(&args, &file).unwrap().context_length(), 32000);
    }

    #[test]
    fn test_tiny_context_rejected() {
        let args = LlmArgs { provider: Some("local".into()), context_length: Some(100), ..Default::default() };
        assert!(matches!(build_provider(&args, &TriageConfig::default()), Err(TriageError::Config(_))));
    }

    #[test]
    fn test_hosted_provider_with_explicit_key() {
        let args = LlmArgs {
            provider: Some("openai".into()),
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let llm = build_provider(&args, &TriageConfig::default()).unwrap();
        assert_eq!(llm.provider_name(), "openai");
    }
}
