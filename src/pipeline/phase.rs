use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowPhase {
    Init,
    InitialScan,
    IterateRecommendations,
    CrossReference,
    Summarize,
    Done,
}

impl WorkflowPhase {
    pub fn definition(&self) -> &'static PhaseDefinition {
        // PHASES is indexed in declaration order.
        &PHASES[*self as usize]
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::InitialScan => write!(f, "initial-scan"),
            Self::IterateRecommendations => write!(f, "iterate-recommendations"),
            Self::CrossReference => write!(f, "cross-reference"),
            Self::Summarize => write!(f, "summarize"),
            Self::Done => write!(f, "done"),
        }
    }
}

pub struct PhaseDefinition {
    pub name: WorkflowPhase,
    pub display_name: &'static str,
    pub description: &'static str,
}

pub static PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        name: WorkflowPhase::Init,
        display_name: "Init",
        description: "Prepare the session directory and ledger",
    },
    PhaseDefinition {
        name: WorkflowPhase::InitialScan,
        display_name: "Initial Scan",
        description: "Full-port service and version scan of the target",
    },
    PhaseDefinition {
        name: WorkflowPhase::IterateRecommendations,
        display_name: "Recommended Commands",
        description: "Run the commands suggested by each interpretation",
    },
    PhaseDefinition {
        name: WorkflowPhase::CrossReference,
        display_name: "Exploit Cross-Reference",
        description: "Look discovered services up in the exploit database",
    },
    PhaseDefinition {
        name: WorkflowPhase::Summarize,
        display_name: "Executive Summary",
        description: "Condense all findings into a final report",
    },
    PhaseDefinition {
        name: WorkflowPhase::Done,
        display_name: "Done",
        description: "Workflow finished",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definitions_line_up() {
        for def in PHASES {
            assert_eq!(def.name.definition().name, def.name);
        }
        assert_eq!(WorkflowPhase::CrossReference.definition().display_name, "Exploit Cross-Reference");
        assert!(WorkflowPhase::Done.is_terminal());
        assert_eq!(WorkflowPhase::InitialScan.to_string(), "initial-scan");
    }
}
