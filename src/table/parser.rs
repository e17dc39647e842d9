//! Line grammar for table source files.
//!
//! # Grammar
//! - Blank or whitespace-only line: skipped
//! - First non-whitespace character `#`: skipped (no inline comments)
//! - `key: value`: split on the first `:` outside a double-quoted run
//! - `key`: no delimiter, value is the empty string
//!
//! # Quoting
//! A quoted run starts at `"` and ends at the next unescaped `"`. Inside a run
//! `:`, `@` and spaces are data, and `\` escapes the following character.
//! Quotes and escapes are kept verbatim in the resulting key/value, so address
//! strings like `"a @ a"@example.org` survive intact.

use thiserror::Error;

/// Why a single line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineError {
    /// The text before the delimiter is empty after trimming.
    #[error("empty key")]
    EmptyKey,

    /// A `"` was opened and never closed on the same line.
    #[error("unterminated quoted string")]
    UnterminatedQuote,
}

/// One key/value pair sourced from a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

impl Entry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Parse one physical line.
///
/// Returns `Ok(None)` for lines that carry no entry (blank lines, comments).
pub fn parse_line(line: &str) -> Result<Option<Entry>, LineError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let Some(at) = find_delimiter(trimmed)? else {
        return Ok(Some(Entry::new(trimmed, "")));
    };

    let key = trimmed[..at].trim();
    if key.is_empty() {
        return Err(LineError::EmptyKey);
    }
    let value = trimmed[at + 1..].trim();

    Ok(Some(Entry::new(key, value)))
}

/// Byte offset of the first `:` outside a quoted run, if any.
///
/// The whole line is scanned so that an unterminated quote after the
/// delimiter is still reported.
fn find_delimiter(line: &str) -> Result<Option<usize>, LineError> {
    let mut in_quotes = false;
    let mut escaped = false;
    let mut delimiter = None;

    for (i, c) in line.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ':' if delimiter.is_none() => delimiter = Some(i),
            _ => {}
        }
    }

    if in_quotes {
        return Err(LineError::UnterminatedQuote);
    }
    Ok(delimiter)
}
