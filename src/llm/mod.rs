pub mod provider;
pub mod anthropic;
pub mod openai;
pub mod local;
pub mod router;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use provider::{LLMProvider, ask};
pub use router::{api_key_env_var, create_provider, DEFAULT_CONTEXT_LENGTH};
pub use types::LLMResponse;
