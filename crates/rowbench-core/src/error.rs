//! Error types for rowbench tooling.
//!
//! These errors mean the *tooling* could not do its job: bad generator
//! parameters, a broken dataset, or an IO failure. Problems with a candidate's
//! output or execution are never errors; they are recorded as
//! [`IssueKind`](crate::IssueKind) entries inside result records.

use thiserror::Error;

/// Main error type for rowbench operations
#[derive(Debug, Error)]
pub enum RowbenchError {
    /// Bad generator or harness parameters; the operator must fix arguments
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// A dataset or reference line does not match the expected grammar
    #[error("Malformed line {line_number}: {content:?}")]
    MalformedLine { line_number: u64, content: String },

    /// The dataset contained no measurements
    #[error("Input contains no measurements")]
    EmptyInput,

    /// The harness itself failed (not the candidate)
    #[error("Harness error: {0}")]
    Harness(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RowbenchError {
    /// Builds a `MalformedLine` error, truncating very long content.
    pub fn malformed(line_number: u64, content: &str) -> Self {
        const MAX_CONTENT: usize = 120;
        let content = if content.len() > MAX_CONTENT {
            let mut end = MAX_CONTENT;
            while !content.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &content[..end])
        } else {
            content.to_string()
        };
        RowbenchError::MalformedLine {
            line_number,
            content,
        }
    }
}

/// Result type alias for rowbench operations
pub type Result<T> = std::result::Result<T, RowbenchError>;
