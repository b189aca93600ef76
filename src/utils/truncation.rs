const MAX_OUTPUT_LENGTH: usize = 15_000;
const MAX_ERROR_LENGTH: usize = 2_000;

/// Keep the head and tail of long text, dropping the middle.
pub fn truncate_output(output: &str) -> String {
    let total = output.chars().count();
    if total <= MAX_OUTPUT_LENGTH {
        return output.to_string();
    }
    let half = MAX_OUTPUT_LENGTH / 2;
    let start = byte_offset(output, half);
    let end = byte_offset(output, total - half);
    format!(
        "{}\n\n... [truncated {} chars] ...\n\n{}",
        &output[..start],
        total - MAX_OUTPUT_LENGTH,
        &output[end..]
    )
}

pub fn truncate_error(error: &str) -> String {
    if error.chars().count() <= MAX_ERROR_LENGTH {
        error.to_string()
    } else {
        format!("{}...", &error[..byte_offset(error, MAX_ERROR_LENGTH)])
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_untouched() {
        assert_eq!(truncate_output("usage: nmap [options]"), "usage: nmap [options]");
        assert_eq!(truncate_error("boom"), "boom");
    }

    #[test]
    fn test_long_output_keeps_both_ends() {
        let text = format!("HEAD{}TAIL", "x".repeat(20_000));
        let out = truncate_output(&text);
        assert!(out.starts_with("HEAD"));
        assert!(out.ends_with("TAIL"));
        assert!(out.contains("[truncated 5008 chars]"));
    }

    #[test]
    fn test_multibyte_does_not_split() {
        let text = "é".repeat(3_000);
        let out = truncate_error(&text);
        assert_eq!(out.chars().count(), MAX_ERROR_LENGTH + 3);
    }
}
