use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "enum": ["anthropic", "openai", "local", "ollama", "openai_compatible"] },
                    "model": { "type": "string" },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string", "format": "uri" },
                    "context_length": { "type": "integer", "minimum": 1 }
                }
            },
            "workflow": {
                "type": "object",
                "properties": {
                    "triage_root": { "type": "string" },
                    "max_depth": { "type": "integer", "minimum": 0 },
                    "command_timeout_secs": { "type": "integer", "minimum": 1 },
                    "help_timeout_secs": { "type": "integer", "minimum": 1 },
                    "validate_commands": { "type": "boolean" },
                    "max_retries": { "type": "integer", "minimum": 0 },
                    "live_tail": { "type": "boolean" }
                }
            },
            "exploits": {
                "type": "object",
                "properties": {
                    "tool": { "type": "string" },
                    "args": { "type": "array", "items": { "type": "string" } },
                    "timeout_secs": { "type": "integer", "minimum": 1 }
                }
            },
            "tools": {
                "type": "array",
                "minItems": 1,
                "items": { "type": "string", "minLength": 1 }
            }
        }
    })
});
