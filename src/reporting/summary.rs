use std::path::Path;
use tokio::io::AsyncWriteExt;
use crate::errors::TriageError;
use crate::interpret::InterpretationResult;

/// Markdown block for one interpreted tool run.
pub fn format_tool_summary(tool: &str, result: &InterpretationResult) -> String {
    format!(
        "## {}\nSummary:\n{}\nRecommended steps:\n{}\n\n",
        tool,
        result.summary,
        result.recommended_steps.join("\n"),
    )
}

/// Append to `summary.md`, creating it on first use.
pub async fn append_tool_summary(
    path: &Path,
    tool: &str,
    result: &InterpretationResult,
) -> Result<(), TriageError> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format_tool_summary(tool, result).as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn result(summary: &str, steps: &[&str]) -> InterpretationResult {
        InterpretationResult {
            summary: summary.into(),
            recommended_steps: steps.iter().map(|s| s.to_string()).collect(),
            services_found: vec![],
        }
    }

    #[test]
    fn test_block_format() {
        let block = format_tool_summary("nmap", &result("- ssh open", &["whatweb http://x", "dig x"]));
        assert_eq!(block, "## nmap\nSummary:\n- ssh open\nRecommended steps:\nwhatweb http://x\ndig x\n\n");
    }

    #[tokio::test]
    async fn test_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("summary.md");

        append_tool_summary(&path, "nmap", &result("a", &[])).await.unwrap();
        append_tool_summary(&path, "whatweb", &result("b", &["curl -I http://x"])).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "## nmap\nSummary:\na\nRecommended steps:\n\n\n## whatweb\nSummary:\nb\nRecommended steps:\ncurl -I http://x\n\n"
        );
    }
}
