pub mod workflow_logger;

pub use workflow_logger::WorkflowLogger;
