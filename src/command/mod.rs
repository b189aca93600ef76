//! Commands as argv token lists, and the gate that turns model-suggested
//! strings into them.

pub mod catalog;
pub mod tokenizer;
pub mod validator;

use std::fmt;
use std::path::Path;
use crate::errors::TriageError;

pub use catalog::ToolCatalog;
pub use tokenizer::{tokenize, TokenizeError};
pub use validator::{CommandValidator, ValidationOutcome, ValidationSkip, DEFAULT_HELP_TIMEOUT};

/// An argv-style command. The first token names the executable; never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    tokens: Vec<String>,
}

impl Command {
    pub fn new<I, S>(tokens: I) -> Result<Self, TriageError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        match tokens.first() {
            None => Err(TriageError::CommandRejected("empty command".into())),
            Some(tool) if tool.trim().is_empty() => {
                Err(TriageError::CommandRejected("empty tool name".into()))
            }
            Some(_) => Ok(Self { tokens }),
        }
    }

    /// Parse an untrusted, model-suggested command line.
    ///
    /// Quote-aware, rejects shell control syntax, and requires the tool to be
    /// in `catalog`.
    pub fn from_suggestion(line: &str, catalog: &ToolCatalog) -> Result<Self, TriageError> {
        let tokens = tokenize(line)
            .map_err(|e| TriageError::CommandRejected(format!("{}: {}", e, line)))?;
        let command = Self::new(tokens)?;
        if !catalog.permits(command.program()) {
            return Err(TriageError::CommandRejected(format!(
                "tool '{}' is not in the allowed catalog",
                command.program()
            )));
        }
        Ok(command)
    }

    /// Executable as given, possibly a path.
    pub fn program(&self) -> &str {
        &self.tokens[0]
    }

    /// Executable basename; names the capture file.
    pub fn tool_name(&self) -> &str {
        let program = self.program();
        Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program)
    }

    pub fn args(&self) -> &[String] {
        &self.tokens[1..]
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

/// The fixed first step of every workflow: full-port service/version scan.
pub fn initial_scan(target: &str) -> Command {
    Command {
        tokens: ["nmap", "-sC", "-sV", "-p-", target]
            .iter()
            .map(|t| t.to_string())
            .collect(),
    }
}
