use crate::command::{Command, ToolCatalog};

pub const ANALYST_SYSTEM: &str = "You are a security assistant supporting an authorized reconnaissance assessment.";

const RESULT_SCHEMA: &str = r#"{
  "summary": "<bullet point summary as a single string>",
  "recommended_steps": ["<command 1>", "<command 2>"],
  "services_found": ["<service version>", "<service version>"]
}"#;

pub fn analysis_prompt(
    command: &Command,
    output: &str,
    catalog: &ToolCatalog,
    exclusions: &[String],
) -> String {
    let excluded = if exclusions.is_empty() {
        "(none yet)".to_string()
    } else {
        exclusions.iter().map(|c| format!("- {}", c)).collect::<Vec<_>>().join("\n")
    };

    format!(
        r#"Analyze the output of this command:

{command}

Tasks:
1. Write a summary of the findings as clear, simple bullet points in one string. Cover services, versions, possible vulnerabilities and anything unusual.
2. Recommend the next commands to run for further reconnaissance or vulnerability discovery.

Rules:
- Only use these tools: {catalog}.
- Do not recommend brute-force attacks.
- Do not recommend any command already executed or suggested:
{excluded}
- Do not recommend the same tool twice.
- Only use flags the tool actually supports; do not invent options.
- Put every identified service with its version in services_found (e.g. "apache 2.4.41") so it can be searched in an exploit database. Use an empty list if there are none.
- Respond with raw JSON only, exactly these three keys, no markdown fences and no commentary:
{schema}

If the output is not a usable result (malformed or irrelevant), respond with exactly: None

Command output:
{output}
"#,
        command = command,
        catalog = catalog,
        excluded = excluded,
        schema = RESULT_SCHEMA,
        output = output,
    )
}

pub fn repair_prompt(malformed: &str) -> String {
    format!(
        r#"The following reply was supposed to be a single valid JSON object but could not be parsed:

--- begin reply ---
{malformed}
--- end reply ---

Return ONLY the corrected JSON object with exactly these keys:
- "summary": a string
- "recommended_steps": a list of command strings
- "services_found": a list of strings

{schema}

Do not add or remove keys. Do not wrap the JSON in markdown fences. No text before or after it.
"#,
        malformed = malformed,
        schema = RESULT_SCHEMA,
    )
}

pub fn validation_prompt(command: &Command, help: &str) -> String {
    format!(
        r#"You check command lines for syntax errors.

Command:
{command}

Help output of `{tool}`:
{help}

Fix the command if its syntax does not match the help output. Keep the same tool and intent.

Return ONLY raw JSON in this form, no markdown and no explanation:
{{"corrected_command": "<the full command as one string>"}}
"#,
        command = command,
        tool = command.tool_name(),
        help = help,
    )
}

pub fn executive_prompt(target: &str, summaries: &str, exploits: &str) -> String {
    let exploits = if exploits.trim().is_empty() { "(no exploit lookups were run)" } else { exploits };
    format!(
        r#"Below are the findings of a reconnaissance assessment of {target}.

Write a high-level executive summary in Markdown that covers:
- the key findings,
- critical services and their versions,
- known exploits or CVEs from the exploit database results,
- suggested next steps for the assessment.

### Tool summaries
{summaries}

### Exploit database results
{exploits}

Return only the Markdown summary.
"#,
        target = target,
        summaries = summaries,
        exploits = exploits,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_carries_exclusions_and_catalog() {
        let cmd = Command::new(["nmap", "-sV", "10.0.0.1"]).unwrap();
        let catalog = ToolCatalog::new(["nmap", "gobuster"]);
        let exclusions = vec!["nmap -sV 10.0.0.1".to_string(), "gobuster dir -u http://10.0.0.1".to_string()];

        let prompt = analysis_prompt(&cmd, "80/tcp open http", &catalog, &exclusions);

        assert!(prompt.contains("- gobuster dir -u http://10.0.0.1"));
        assert!(prompt.contains("nmap, gobuster"));
        assert!(prompt.contains("80/tcp open http"));
        assert!(prompt.contains("respond with exactly: None"));
    }

    #[test]
    fn test_repair_prompt_restates_reply() {
        let prompt = repair_prompt("{summary: oops");
        assert!(prompt.contains("{summary: oops"));
        assert!(prompt.contains("\"services_found\""));
    }

    #[test]
    fn test_executive_prompt_without_exploits() {
        let prompt = executive_prompt("10.0.0.1", "## nmap\n", "");
        assert!(prompt.contains("(no exploit lookups were run)"));
    }
}
