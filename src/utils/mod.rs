pub mod formatting;
pub mod truncation;

pub use formatting::{count_noun, format_duration};
pub use truncation::{truncate_error, truncate_output};
