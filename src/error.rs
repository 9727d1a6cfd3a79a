//! Error types for omnirender.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use crate::schema::SchemaReport;
use thiserror::Error;

/// Main error type for omnirender operations.
///
/// Every variant is fatal. Each maps to an exit code via [`RenderError::exit_code`].
#[derive(Error, Debug)]
pub enum RenderError {
    /// Template syntax error: unterminated `{{`, empty or invalid name, unknown filter.
    #[error("malformed placeholder at line {line}, column {column}: {reason}")]
    MalformedToken {
        reason: String,
        line: usize,
        column: usize,
    },

    /// A placeholder referenced a key the context does not define.
    #[error("missing key '{name}' referenced at line {line}, column {column}")]
    MissingKey {
        name: String,
        line: usize,
        column: usize,
    },

    /// A substituted value introduced `{{` or `}}` into the output.
    #[error(
        "rendered output contains placeholder delimiters at byte {offset}; \
         a context value must not contain '{{{{' or '}}}}'"
    )]
    ResidualDelimiter { offset: usize },

    /// The rendered document failed schema validation.
    #[error("{}", .0.format_error())]
    SchemaViolation(SchemaReport),

    /// Bad arguments, unreadable input, invalid config or context.
    #[error("{0}")]
    UserError(String),
}

impl RenderError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            RenderError::MalformedToken { .. } => exit_codes::USER_ERROR,
            RenderError::MissingKey { .. } => exit_codes::USER_ERROR,
            RenderError::ResidualDelimiter { .. } => exit_codes::USER_ERROR,
            RenderError::SchemaViolation(_) => exit_codes::SCHEMA_VIOLATION,
            RenderError::UserError(_) => exit_codes::USER_ERROR,
        }
    }
}

/// Result type alias for omnirender operations.
pub type Result<T> = std::result::Result<T, RenderError>;
