use std::path::Path;
use crate::capture::PROMPT_SAFETY_MARGIN;
use crate::errors::TriageError;
use super::types::TriageConfig;
use super::security::validate_security_patterns;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

const MAX_CONFIG_BYTES: u64 = 1_048_576;

pub async fn parse_config(path: &Path) -> Result<TriageConfig, TriageError> {
    if !path.exists() {
        return Err(TriageError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_CONFIG_BYTES {
        return Err(TriageError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<TriageConfig, TriageError> {
    // An empty file is a valid, empty config.
    if content.trim().is_empty() {
        return Ok(TriageConfig::default());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_security_patterns(&yaml)?;
    validate_schema(&yaml)?;

    let config: TriageConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Structural check. Violations are logged, not fatal.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), TriageError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| TriageError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| TriageError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &TriageConfig) -> Result<(), TriageError> {
    if let Some(llm) = &config.llm {
        if let Some(ctx) = llm.context_length {
            if ctx <= PROMPT_SAFETY_MARGIN {
                return Err(TriageError::Config(format!(
                    "llm.context_length must exceed {} tokens, got {}",
                    PROMPT_SAFETY_MARGIN, ctx
                )));
            }
        }
        if llm.provider.as_deref() == Some("openai_compatible") && llm.base_url.is_none() {
            return Err(TriageError::Config("openai_compatible provider requires llm.base_url".into()));
        }
    }

    if let Some(wf) = &config.workflow {
        for (key, value) in [
            ("workflow.command_timeout_secs", wf.command_timeout_secs),
            ("workflow.help_timeout_secs", wf.help_timeout_secs),
        ] {
            if value == Some(0) {
                return Err(TriageError::Config(format!("{} must be greater than zero", key)));
            }
        }
        if wf.triage_root.as_deref().is_some_and(|root| root.trim().is_empty()) {
            return Err(TriageError::Config("workflow.triage_root must not be empty".into()));
        }
    }

    if let Some(ex) = &config.exploits {
        if ex.timeout_secs == Some(0) {
            return Err(TriageError::Config("exploits.timeout_secs must be greater than zero".into()));
        }
        if ex.tool.as_deref().is_some_and(|tool| tool.trim().is_empty()) {
            return Err(TriageError::Config("exploits.tool must not be empty".into()));
        }
    }

    if let Some(tools) = &config.tools {
        if tools.iter().all(|t| t.trim().is_empty()) {
            return Err(TriageError::Config("tools must list at least one tool".into()));
        }
        if tools.iter().any(|t| t.contains(char::is_whitespace)) {
            return Err(TriageError::Config("tool names must not contain whitespace".into()));
        }
    }

    if config.workflow.as_ref().and_then(|wf| wf.validate_commands) == Some(false) {
        warn!("Command validation disabled; suggested commands run as given");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FULL: &str = r#"
llm:
  provider: local
  model: llama3.1
  base_url: http://localhost:11434
  context_length: 16384
workflow:
  triage_root: /tmp/triage
  max_depth: 2
  command_timeout_secs: 120
exploits:
  tool: searchsploit
  timeout_secs: 30
tools:
  - nmap
  - whatweb
"#;

    #[test]
    fn test_full_config_parses() {
        let config = parse_config_str(FULL).unwrap();
        assert_eq!(config.llm().context_length, Some(16384));
        let wf = config.workflow_config();
        assert_eq!(wf.max_depth, 2);
        assert_eq!(wf.command_timeout, Duration::from_secs(120));
        assert_eq!(wf.catalog.names(), &["nmap".to_string(), "whatweb".to_string()]);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config_str("").unwrap();
        assert!(config.llm.is_none());
    }

    #[test]
    fn test_context_length_must_exceed_margin() {
        assert!(parse_config_str("llm:\n  context_length: 200\n").is_err());
        assert!(parse_config_str("llm:\n  context_length: 201\n").is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse_config_str("workflow:\n  command_timeout_secs: 0\n").is_err());
        assert!(parse_config_str("exploits:\n  timeout_secs: 0\n").is_err());
    }

    #[test]
    fn test_blank_tool_list_rejected() {
        assert!(parse_config_str("tools: ['', ' ']\n").is_err());
        assert!(parse_config_str("tools: ['nmap -sV']\n").is_err());
    }

    #[test]
    fn test_openai_compatible_needs_base_url() {
        assert!(parse_config_str("llm:\n  provider: openai_compatible\n").is_err());
    }

    #[test]
    fn test_traversal_in_root_rejected() {
        let err = parse_config_str("workflow:\n  triage_root: ../../etc\n").unwrap_err();
        assert!(matches!(err, TriageError::Config(_)));
    }

    #[test]
    fn test_wrong_type_is_yaml_error() {
        let err = parse_config_str("workflow:\n  max_depth: deep\n").unwrap_err();
        assert!(matches!(err, TriageError::Yaml(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/triage.yaml")).await.unwrap_err();
        assert!(matches!(err, TriageError::Config(_)));
    }
}
