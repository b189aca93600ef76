use tracing::debug;
use crate::llm::api_key_env_var;

/// A value starting with `$` names an environment variable; anything else is literal.
pub fn resolve_credential(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        match std::env::var(var_name) {
            Ok(resolved) => {
                debug!(var = %var_name, "Resolved credential from environment");
                resolved
            }
            Err(_) => {
                debug!(var = %var_name, "Environment variable not set, using literal");
                value.to_string()
            }
        }
    } else {
        value.to_string()
    }
}

/// Flag first, then the config file, then the provider's conventional variable.
/// Local endpoints commonly need no key, so an empty key is not an error here.
pub fn resolve_api_key(flag: Option<&str>, configured: Option<&str>, provider: &str) -> String {
    if let Some(key) = flag.filter(|k| !k.is_empty()) {
        return resolve_credential(key);
    }
    if let Some(key) = configured.filter(|k| !k.is_empty()) {
        return resolve_credential(key);
    }
    api_key_env_var(provider)
        .and_then(|var| std::env::var(var).ok())
        .unwrap_or_default()
}
