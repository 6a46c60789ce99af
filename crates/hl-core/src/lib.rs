//! Shared primitives used across the highlighter crates.

use core::fmt;

/// Result alias used across the workspace.
pub type HighlightResult<T> = Result<T, HighlightError>;

/// Workspace error: a dotted machine-readable code plus a human message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightError {
    pub code: &'static str,
    pub message: String,
}

impl HighlightError {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for HighlightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for HighlightError {}
