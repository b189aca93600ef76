use std::fmt;
use std::path::Path;

/// Tools the interpretation service may recommend, and the only executables a
/// recommendation is allowed to launch.
pub const DEFAULT_TOOLS: &[&str] = &[
    "nmap", "gobuster", "ffuf", "http", "whatweb", "wpscan", "dig", "dnsrecon",
    "smtp-user-enum", "swaks", "lftp", "ftp", "hydra", "onesixtyone", "snmpwalk",
    "snmp-check", "smbclient", "smbmap", "enum4linux", "rpcinfo", "nbtscan",
    "curl", "wget", "git", "nikto", "traceroute", "nc",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCatalog {
    tools: Vec<String>,
}

impl ToolCatalog {
    pub fn new<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for tool in tools {
            let tool = tool.into().trim().to_string();
            if !tool.is_empty() && !names.contains(&tool) {
                names.push(tool);
            }
        }
        Self { tools: names }
    }

    /// A bare name matches an entry or an entry's basename. A program given
    /// as a path must equal an entry exactly, so `/tmp/x/nmap` is not `nmap`.
    pub fn permits(&self, program: &str) -> bool {
        if program.contains('/') {
            return self.tools.iter().any(|t| t == program);
        }
        self.tools.iter().any(|t| {
            t == program || Path::new(t).file_name().and_then(|n| n.to_str()) == Some(program)
        })
    }

    pub fn names(&self) -> &[String] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLS.iter().copied())
    }
}

impl fmt::Display for ToolCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tools.join(", "))
    }
}
