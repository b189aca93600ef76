pub mod audit;
pub mod capture;
pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod exploits;
pub mod interpret;
pub mod llm;
pub mod pipeline;
pub mod reporting;
pub mod session;
pub mod utils;

pub use errors::TriageError;
