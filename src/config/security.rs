use crate::errors::TriageError;

/// Rejected in any config string.
const DANGEROUS_PATTERNS: &[&str] = &["../", "..\\", "<script"];

/// Rejected as the scheme of URL-valued keys.
const SCRIPT_SCHEMES: &[&str] = &["javascript:", "data:", "file:", "vbscript:"];

const URL_KEYS: &[&str] = &["base_url"];

/// Reject config strings carrying traversal or script payloads. Every
/// offending path is reported, not just the first.
pub fn validate_security_patterns(value: &serde_yaml::Value) -> Result<(), TriageError> {
    let mut hits = Vec::new();
    collect_hits(value, &mut Vec::new(), &mut hits);
    if hits.is_empty() {
        return Ok(());
    }
    Err(TriageError::Config(format!("Dangerous pattern in config: {}", hits.join("; "))))
}

fn collect_hits(value: &serde_yaml::Value, path: &mut Vec<String>, hits: &mut Vec<String>) {
    match value {
        serde_yaml::Value::String(s) => {
            let lower = s.trim().to_lowercase();
            let is_url = path.last().is_some_and(|key| URL_KEYS.contains(&key.as_str()));
            let hit = DANGEROUS_PATTERNS
                .iter()
                .find(|p| lower.contains(*p))
                .or_else(|| SCRIPT_SCHEMES.iter().find(|p| is_url && lower.starts_with(*p)));
            if let Some(pattern) = hit {
                let at = if path.is_empty() { "root".to_string() } else { path.join(".") };
                hits.push(format!("'{}' at {}", pattern, at));
            }
        }
        serde_yaml::Value::Mapping(map) => {
            for (k, v) in map {
                path.push(k.as_str().unwrap_or("unknown").to_string());
                collect_hits(v, path, hits);
                path.pop();
            }
        }
        serde_yaml::Value::Sequence(seq) => {
            for (i, v) in seq.iter().enumerate() {
                path.push(format!("[{}]", i));
                collect_hits(v, path, hits);
                path.pop();
            }
        }
        _ => {}
    }
}
