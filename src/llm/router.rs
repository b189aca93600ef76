use crate::errors::TriageError;
use super::provider::LLMProvider;
use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::local::LocalProvider;

pub const DEFAULT_CONTEXT_LENGTH: usize = 8192;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
    context_length: usize,
) -> Result<Box<dyn LLMProvider>, TriageError> {
    match provider_name {
        "anthropic" => Ok(Box::new(AnthropicProvider::new(api_key, model, context_length))),
        "openai" => Ok(Box::new(OpenAIProvider::new(api_key, model, context_length))),
        "local" | "ollama" => Ok(Box::new(LocalProvider::new(base_url, model, api_key, context_length))),
        "openai_compatible" => {
            let url = base_url.ok_or_else(|| TriageError::Config(
                "openai_compatible provider requires a base_url".into()
            ))?;
            Ok(Box::new(OpenAIProvider::with_base_url(api_key, model, url, context_length)))
        }
        _ => Err(TriageError::Config(format!("Unknown LLM provider: {}", provider_name))),
    }
}

/// Environment variable conventionally holding the key for `provider`.
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        "openai" | "openai_compatible" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_providers_resolve() {
        for name in ["anthropic", "openai", "local", "ollama"] {
            let provider = create_provider(name, "key", None, None, 4096).unwrap();
            assert_eq!(provider.context_length(), 4096);
        }
    }

    #[test]
    fn test_local_alias_reports_local() {
        let provider = create_provider("ollama", "", Some("llama3"), None, 2048).unwrap();
        assert_eq!(provider.provider_name(), "local");
        assert_eq!(provider.model_name(), "llama3");
    }

    #[test]
    fn test_openai_compatible_requires_base_url() {
        let err = create_provider("openai_compatible", "key", None, None, 4096).err().unwrap();
        assert!(matches!(err, TriageError::Config(_)));
        assert!(create_provider("openai_compatible", "key", None, Some("http://llm:8000/v1"), 4096).is_ok());
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = create_provider("carrier-pigeon", "", None, None, 4096).err().unwrap();
        assert!(matches!(err, TriageError::Config(_)));
    }

    #[test]
    fn test_api_key_env_var() {
        assert_eq!(api_key_env_var("anthropic"), Some("ANTHROPIC_API_KEY"));
        assert_eq!(api_key_env_var("local"), None);
    }
}
