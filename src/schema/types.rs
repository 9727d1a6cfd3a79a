//! Schema validation results and violations.

use std::fmt;

/// What went wrong with a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Required field had no value in the document.
    Missing,
    /// Value is not of the expected kind (e.g. `abc` for an int).
    WrongType,
    /// Value has the right shape but is outside the allowed range.
    OutOfRange,
    /// URL, host name or email that fails to parse.
    Malformed,
    /// Value does not match the field's pattern.
    PatternMismatch,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViolationKind::Missing => "missing",
            ViolationKind::WrongType => "wrong type",
            ViolationKind::OutOfRange => "out of range",
            ViolationKind::Malformed => "malformed",
            ViolationKind::PatternMismatch => "pattern mismatch",
        };
        f.write_str(label)
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Schema field name.
    pub field: String,
    /// The offending value, absent for missing fields.
    pub value: Option<String>,
    pub kind: ViolationKind,
    /// Human-readable detail.
    pub message: String,
}

impl SchemaViolation {
    pub fn new(
        field: impl Into<String>,
        value: Option<&str>,
        kind: ViolationKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.map(str::to_string),
            kind,
            message: message.into(),
        }
    }
}

/// Result of schema validation.
#[derive(Debug, Clone)]
pub struct SchemaReport {
    /// Whether validation passed (no violations).
    pub passed: bool,
    /// List of violations (empty if passed).
    pub violations: Vec<SchemaViolation>,
}

impl SchemaReport {
    pub fn pass() -> Self {
        Self {
            passed: true,
            violations: Vec::new(),
        }
    }

    pub fn fail(violations: Vec<SchemaViolation>) -> Self {
        Self {
            passed: false,
            violations,
        }
    }

    /// Format the report as a user-facing error message.
    ///
    /// ```text
    /// Schema validation failed (2 violations)
    ///
    ///   smtp_port: out of range: port must be between 1 and 65535 (got '70000')
    ///   domain: missing: no value in rendered document
    /// ```
    pub fn format_error(&self) -> String {
        if self.passed {
            return String::new();
        }

        let mut msg = format!(
            "Schema validation failed ({} violation{})\n\n",
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        );

        for v in &self.violations {
            msg.push_str(&format!("  {}: {}: {}", v.field, v.kind, v.message));
            if let Some(value) = &v.value {
                msg.push_str(&format!(" (got '{}')", value));
            }
            msg.push('\n');
        }

        msg
    }
}
