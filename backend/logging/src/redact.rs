//! Log Redaction Layer
//!
//! Scrubs bot tokens, bearer tokens and phone numbers from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap());
static BOT_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[MNO][A-Za-z\d_-]{23,27}\.[A-Za-z\d_-]{6}\.[A-Za-z\d_-]{27,40}").unwrap());
static BEARER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(Bot|Bearer)\s+[a-zA-Z0-9\-\._~+/]{20,}=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = BOT_TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]");
    TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redaction() {
        let raw = "call me at +1-555-123-4567, header Bearer eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("+1-555-123-4567"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9"));
        assert!(clean.contains("[REDACTED_PHONE]"));
    }

    #[test]
    fn test_bot_token_redaction() {
        let token = "MTA5ODc2NTQzMjEwOTg3NjU0Mw.GhIjKl.abcdefghijklmnopqrstuvwxyz0123";
        let clean = redact_sensitive_data(&format!("oops I pasted {token} here"));
        assert!(!clean.contains(token));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(redact_sensitive_data("see you in voice later"), "see you in voice later");
        assert_eq!(redact_sensitive_data("the Bot said hi"), "the Bot said hi");
    }
}
