use std::sync::LazyLock;
use regex::Regex;

/// Approximates how many model tokens a piece of text costs.
pub trait TokenEstimator: Send + Sync {
    fn estimate(&self, text: &str) -> usize;
}

static WORD_OR_SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+|\S").unwrap());

/// One token per run of word characters plus one per standalone symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordPunctEstimator;

impl TokenEstimator for WordPunctEstimator {
    fn estimate(&self, text: &str) -> usize {
        WORD_OR_SYMBOL.find_iter(text).count()
    }
}
