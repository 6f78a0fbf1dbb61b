//! Voice state transitions.
//!
//! Only entering voice from nowhere counts as joining a call; moving between
//! channels, muting and leaving do not.

/// `before`/`after` are the member's channel ids around a voice state update.
pub fn is_voice_join(before: Option<u64>, after: Option<u64>) -> bool {
    before.is_none() && after.is_some()
}

/// Log content for a call event.
pub fn call_content(channel_name: &str) -> String {
    format!("Joined {channel_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_join_counts() {
        assert!(is_voice_join(None, Some(7)));
        assert!(!is_voice_join(Some(7), Some(8)));
        assert!(!is_voice_join(Some(7), None));
        assert!(!is_voice_join(None, None));
    }

    #[test]
    fn content_names_the_channel() {
        assert_eq!(call_content("General"), "Joined General");
    }
}
