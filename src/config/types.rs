use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::command::ToolCatalog;
use crate::errors::RetryConfig;
use crate::pipeline::WorkflowConfig;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct TriageConfig {
    pub llm: Option<LLMConfig>,
    pub workflow: Option<WorkflowSection>,
    pub exploits: Option<ExploitsConfig>,
    /// Replaces the built-in tool allow-list when present.
    pub tools: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LLMConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub context_length: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct WorkflowSection {
    pub triage_root: Option<String>,
    pub max_depth: Option<usize>,
    pub command_timeout_secs: Option<u64>,
    pub help_timeout_secs: Option<u64>,
    pub validate_commands: Option<bool>,
    pub max_retries: Option<u32>,
    pub live_tail: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExploitsConfig {
    pub tool: Option<String>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

impl TriageConfig {
    pub fn llm(&self) -> LLMConfig {
        self.llm.clone().unwrap_or_default()
    }

    pub fn catalog(&self) -> ToolCatalog {
        match &self.tools {
            Some(tools) => ToolCatalog::new(tools.iter().cloned()),
            None => ToolCatalog::default(),
        }
    }

    /// File values layered over the built-in defaults.
    pub fn workflow_config(&self) -> WorkflowConfig {
        let mut config = WorkflowConfig {
            catalog: self.catalog(),
            ..WorkflowConfig::default()
        };
        if let Some(wf) = &self.workflow {
            if let Some(root) = &wf.triage_root {
                config.triage_root = PathBuf::from(root);
            }
            if let Some(depth) = wf.max_depth {
                config.max_depth = depth;
            }
            if let Some(secs) = wf.command_timeout_secs {
                config.command_timeout = Duration::from_secs(secs);
            }
            if let Some(secs) = wf.help_timeout_secs {
                config.help_timeout = Duration::from_secs(secs);
            }
            if let Some(validate) = wf.validate_commands {
                config.validate_commands = validate;
            }
            if let Some(retries) = wf.max_retries {
                config.retry = RetryConfig { max_retries: retries };
            }
            if let Some(live_tail) = wf.live_tail {
                config.live_tail = live_tail;
            }
        }
        if let Some(ex) = &self.exploits {
            if let Some(tool) = &ex.tool {
                config.exploit_tool = tool.clone();
            }
            if let Some(args) = &ex.args {
                config.exploit_args = args.clone();
            }
            if let Some(secs) = ex.timeout_secs {
                config.exploit_timeout = Duration::from_secs(secs);
            }
        }
        config
    }
}
