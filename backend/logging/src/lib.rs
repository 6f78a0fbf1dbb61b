//! Structured logging for the activity tracker.
//!
//! Console plus daily-rotated JSON file output, and redaction of secrets that
//! may appear in recorded message content.

pub mod logger;
pub mod redact;

pub use logger::{init_logger, LOG_FILE_PREFIX};
pub use redact::redact_sensitive_data;
