//! Schema validation for rendered documents.
//!
//! - Kinds: string, int, port, bool, url, hostname, email
//! - Every violation is collected, not only the first
//!
//! Error handling:
//! - Invalid regex patterns are config errors (exit 1), not violations (exit 2)

mod kinds;
mod model;
mod types;
mod validator;

#[cfg(test)]
mod tests;

pub use kinds::Kind;
pub use model::{FieldRule, FieldSpec, Schema};
pub use types::{SchemaReport, SchemaViolation, ViolationKind};
pub use validator::{CompiledSchema, validate, validate_with_schema};
