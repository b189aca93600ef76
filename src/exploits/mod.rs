use std::collections::BTreeSet;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use crate::errors::TriageError;
use crate::interpret::ServiceSignature;
use crate::utils::truncation::truncate_error;

pub const DEFAULT_EXPLOIT_TOOL: &str = "searchsploit";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossReferenceReport {
    pub looked_up: usize,
    pub failed: Vec<ServiceSignature>,
}

/// Looks every discovered service up in the exploit database and appends the
/// raw results to `exploits.txt`.
pub struct ExploitCrossReferencer {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl Default for ExploitCrossReferencer {
    fn default() -> Self {
        Self::new(DEFAULT_EXPLOIT_TOOL)
    }
}

impl ExploitCrossReferencer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Fixed arguments placed before the signature.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// A failing lookup is written inline and never stops the loop. Only
    /// failing to open `exploits.txt` is an error.
    pub async fn cross_reference(
        &self,
        services: &BTreeSet<ServiceSignature>,
        exploits_path: &Path,
    ) -> Result<CrossReferenceReport, TriageError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(exploits_path)
            .await?;
        let mut report = CrossReferenceReport::default();

        for signature in services {
            info!(program = %self.program, service = %signature, "Looking up exploits");
            let block = match self.lookup(signature).await {
                Ok(stdout) => {
                    debug!(service = %signature, bytes = stdout.len(), "Exploit lookup finished");
                    format!("### {} ###\n{}\n", signature, stdout)
                }
                Err(detail) => {
                    warn!(program = %self.program, service = %signature, error = %detail, "Exploit lookup failed");
                    report.failed.push(signature.clone());
                    format!("Error running {} for {}: {}\n", self.program, signature, detail)
                }
            };
            file.write_all(block.as_bytes()).await?;
            report.looked_up += 1;
        }
        file.flush().await?;
        Ok(report)
    }

    async fn lookup(&self, signature: &str) -> Result<String, String> {
        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(signature)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("failed to start: {}", e))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| format!("timed out after {}s", self.timeout.as_secs()))?
            .map_err(|e| e.to_string())?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let status = match output.status.code() {
                Some(code) => format!("exit status {}", code),
                None => "terminated by signal".to_string(),
            };
            return Err(if stderr.trim().is_empty() {
                status
            } else {
                format!("{}: {}", status, truncate_error(stderr.trim()))
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn services(items: &[&str]) -> BTreeSet<ServiceSignature> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_appends_block_per_signature() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploits.txt");

        let report = ExploitCrossReferencer::new("echo")
            .cross_reference(&services(&["openssh 8.2p1", "apache 2.4.41"]), &path)
            .await
            .unwrap();

        assert_eq!(report.looked_up, 2);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "### apache 2.4.41 ###\napache 2.4.41\n\n### openssh 8.2p1 ###\nopenssh 8.2p1\n\n"
        );
    }

    #[tokio::test]
    async fn test_nonzero_exit_written_inline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploits.txt");

        let report = ExploitCrossReferencer::new("false")
            .cross_reference(&services(&["vsftpd 2.3.4"]), &path)
            .await
            .unwrap();

        assert_eq!(report.failed, vec!["vsftpd 2.3.4".to_string()]);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Error running false for vsftpd 2.3.4: exit status 1"));
    }

    #[tokio::test]
    async fn test_missing_tool_continues() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploits.txt");

        let report = ExploitCrossReferencer::new("no-such-searchsploit-xyz")
            .cross_reference(&services(&["a 1", "b 2"]), &path)
            .await
            .unwrap();

        assert_eq!(report.looked_up, 2);
        assert_eq!(report.failed.len(), 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_timeout_is_a_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploits.txt");

        let report = ExploitCrossReferencer::new("sh")
            .with_args(["-c", "sleep 30", "lookup"])
            .with_timeout(Duration::from_millis(300))
            .cross_reference(&services(&["slow 1.0"]), &path)
            .await
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Error running sh for slow 1.0: timed out"));
    }

    #[tokio::test]
    async fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exploits.txt");
        std::fs::write(&path, "earlier\n").unwrap();

        ExploitCrossReferencer::new("echo")
            .cross_reference(&services(&["x 1"]), &path)
            .await
            .unwrap();

        assert!(std::fs::read_to_string(&path).unwrap().starts_with("earlier\n### x 1 ###\n"));
    }
}
