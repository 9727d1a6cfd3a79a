//! Exit code constants for the omnirender CLI.
//!
//! - 0: Success
//! - 1: User error (missing key, malformed token, bad config, I/O)
//! - 2: Schema violation

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: missing context key, malformed template, unreadable input or bad config.
pub const USER_ERROR: i32 = 1;

/// Schema violation: the rendered document failed validation.
pub const SCHEMA_VIOLATION: i32 = 2;
