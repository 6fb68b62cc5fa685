//! Validation of client-supplied mode and line tokens.

use std::fmt;

/// What a token names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Mode,
    Line,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Mode => write!(f, "mode"),
            TokenKind::Line => write!(f, "line"),
        }
    }
}

/// A token that is not in its whitelist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{token}'; valid {kind}s are: {}", .valid.join(", "))]
pub struct ValidationError {
    pub kind: TokenKind,
    pub token: String,
    pub valid: Vec<String>,
}

/// Split a comma-separated parameter into trimmed, non-empty tokens.
pub fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check a single token against `valid`.
pub fn validate_token(
    kind: TokenKind,
    token: &str,
    valid: &[String],
) -> Result<(), ValidationError> {
    if valid.iter().any(|v| v == token) {
        Ok(())
    } else {
        Err(ValidationError {
            kind,
            token: token.to_string(),
            valid: valid.to_vec(),
        })
    }
}

/// Check every token against `valid`, failing on the first unknown one.
pub fn validate_tokens(
    kind: TokenKind,
    tokens: &[String],
    valid: &[String],
) -> Result<(), ValidationError> {
    tokens
        .iter()
        .try_for_each(|token| validate_token(kind, token, valid))
}
