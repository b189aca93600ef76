/// Commands already run and already recommended during one workflow run.
///
/// Both lists only grow. Duplicates are kept as they arrive; set semantics are
/// applied where a caller needs them.
#[derive(Debug, Clone, Default)]
pub struct RecommendationLedger {
    executed: Vec<String>,
    recommended: Vec<String>,
}

impl RecommendationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_executed(&mut self, command: impl Into<String>) {
        self.executed.push(command.into());
    }

    pub fn record_recommended<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommended.extend(commands.into_iter().map(Into::into));
    }

    /// Everything the service must not suggest again: executed, then recommended.
    pub fn exclusions(&self) -> Vec<String> {
        self.executed.iter().chain(self.recommended.iter()).cloned().collect()
    }

    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    pub fn recommended(&self) -> &[String] {
        &self.recommended
    }

    pub fn was_executed(&self, command: &str) -> bool {
        self.executed.iter().any(|c| c == command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let ledger = RecommendationLedger::new();
        assert!(ledger.exclusions().is_empty());
    }

    #[test]
    fn test_exclusions_concatenate_in_order() {
        let mut ledger = RecommendationLedger::new();
        ledger.record_executed("nmap -sV x");
        ledger.record_recommended(["gobuster dir -u http://x", "whatweb http://x"]);
        ledger.record_executed("gobuster dir -u http://x");

        assert_eq!(
            ledger.exclusions(),
            vec![
                "nmap -sV x",
                "gobuster dir -u http://x",
                "gobuster dir -u http://x",
                "whatweb http://x",
            ]
        );
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut ledger = RecommendationLedger::new();
        ledger.record_recommended(["curl http://x"]);
        ledger.record_recommended(["curl http://x"]);
        assert_eq!(ledger.recommended().len(), 2);
    }

    #[test]
    fn test_lists_never_shrink() {
        let mut ledger = RecommendationLedger::new();
        let mut last = (0, 0);
        for i in 0..5 {
            ledger.record_executed(format!("cmd {}", i));
            ledger.record_recommended(Vec::<String>::new());
            ledger.record_recommended([format!("next {}", i)]);
            let now = (ledger.executed().len(), ledger.recommended().len());
            assert!(now.0 > last.0 && now.1 > last.1);
            last = now;
        }
        assert!(ledger.was_executed("cmd 3"));
        assert!(!ledger.was_executed("next 3"));
    }
}
