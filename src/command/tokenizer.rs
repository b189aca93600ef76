use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("empty command line")]
    Empty,
    #[error("unbalanced {0} quote")]
    UnbalancedQuote(char),
    #[error("dangling escape at end of line")]
    DanglingEscape,
    #[error("shell syntax '{0}' is not allowed")]
    ShellSyntax(String),
}

#[derive(Clone, Copy, PartialEq)]
enum Quote {
    None,
    Single,
    Double,
}

const CONTROL_CHARS: &[char] = &[';', '|', '&', '<', '>', '`'];

/// Split a command line into argv tokens without invoking a shell.
///
/// Handles single quotes (literal), double quotes (`\"`, `\\`, `\$` and `` \` ``
/// escapes) and backslash escapes outside quotes. Unquoted control operators
/// and `$(` are rejected.
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => match chars.peek() {
                    Some(&next) if matches!(next, '"' | '\\' | '$' | '`') => {
                        current.push(next);
                        chars.next();
                    }
                    _ => current.push('\\'),
                },
                _ => current.push(c),
            },
            Quote::None => match c {
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                '\'' => {
                    quote = Quote::Single;
                    in_token = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_token = true;
                }
                '\\' => {
                    let escaped = chars.next().ok_or(TokenizeError::DanglingEscape)?;
                    current.push(escaped);
                    in_token = true;
                }
                '$' if chars.peek() == Some(&'(') => {
                    return Err(TokenizeError::ShellSyntax("$(".into()));
                }
                c if CONTROL_CHARS.contains(&c) => {
                    return Err(TokenizeError::ShellSyntax(c.to_string()));
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    match quote {
        Quote::Single => return Err(TokenizeError::UnbalancedQuote('\'')),
        Quote::Double => return Err(TokenizeError::UnbalancedQuote('"')),
        Quote::None => {}
    }
    if in_token {
        tokens.push(current);
    }
    if tokens.is_empty() {
        return Err(TokenizeError::Empty);
    }
    Ok(tokens)
}
