pub mod interpreter;
pub mod parser;
pub mod prompts;

pub use interpreter::{Interpretation, ResponseInterpreter};
pub use parser::{InterpretationResult, ParsedReply, ServiceSignature, parse_reply, strip_code_fence};
