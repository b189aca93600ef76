pub mod console;
pub mod executive;
pub mod summary;

pub use console::{Console, LiveTail, Spinner};
pub use executive::{ExecutiveSummarizer, ExecutiveSummary};
pub use summary::{append_tool_summary, format_tool_summary};
