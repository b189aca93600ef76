use serde::{Deserialize, Deserializer, Serialize};
use crate::errors::TriageError;

/// Free-text service plus version, e.g. `apache 2.4.41`.
pub type ServiceSignature = String;

/// Reply meaning "this output was not usable for analysis".
pub const UNUSABLE_REPLY: &str = "None";

/// The three-key record every interpretation reply must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationResult {
    #[serde(deserialize_with = "text_or_lines")]
    pub summary: String,
    pub recommended_steps: Vec<String>,
    pub services_found: Vec<ServiceSignature>,
}

/// What a reply turned out to be once fences are stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    Result(InterpretationResult),
    Unusable,
}

/// Models often answer with a bullet array where a string was asked for.
fn text_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrLines {
        Text(String),
        Lines(Vec<String>),
    }

    Ok(match TextOrLines::deserialize(deserializer)? {
        TextOrLines::Text(text) => text,
        TextOrLines::Lines(lines) => lines.join("\n"),
    })
}

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence, if any.
pub fn strip_code_fence(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse a raw interpretation reply. `None` is a valid answer, not an error.
pub fn parse_reply(reply: &str) -> Result<ParsedReply, TriageError> {
    let body = strip_code_fence(reply);
    if body == UNUSABLE_REPLY {
        return Ok(ParsedReply::Unusable);
    }
    serde_json::from_str::<InterpretationResult>(body)
        .map(ParsedReply::Result)
        .map_err(|e| TriageError::OutputValidation(format!("Invalid interpretation reply: {}", e)))
}
