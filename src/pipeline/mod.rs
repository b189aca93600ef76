pub mod orchestrator;
pub mod phase;
pub mod state;

pub use orchestrator::WorkflowOrchestrator;
pub use phase::WorkflowPhase;
pub use state::{SkippedCommand, SummaryStatus, WorkflowConfig, WorkflowReport, DEFAULT_MAX_DEPTH};
