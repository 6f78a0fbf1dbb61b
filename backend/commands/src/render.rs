//! Plain-text renderings posted back to the guild.

use crate::service::{Departure, ServerActivity, UserActivity};

/// Shown wherever a value was never recorded.
pub const NOT_AVAILABLE: &str = "N/A";

const RULE: &str = "-----------------------------------------------------";

fn or_na(value: Option<&str>) -> &str {
    value.unwrap_or(NOT_AVAILABLE)
}

/// `display` is how the user is named in the header, e.g. a mention.
pub fn render_user_activity(activity: &UserActivity, display: &str) -> String {
    let mut out = format!("User {display} Activity Summary:\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Last Message Sent:        {}\n", or_na(activity.last_message.as_deref())));
    out.push_str(&format!("Last Voice Call Joined:   {}\n", or_na(activity.last_call.as_deref())));
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Total Messages Sent:      {}\n", activity.messages));
    out.push_str(&format!("Total Voice Calls Joined: {}\n", activity.calls));
    out
}

/// Zero-count entries are left out of both rankings.
pub fn render_server_activity(activity: &ServerActivity) -> String {
    let mut out = String::from("Most Messages Sent:\n");
    push_ranking(&mut out, &activity.by_messages, "messages");
    out.push_str(RULE);
    out.push('\n');
    out.push_str("Most Voice Calls Joined:\n");
    push_ranking(&mut out, &activity.by_calls, "calls");
    out
}

fn push_ranking(out: &mut String, ranking: &[(String, u64)], unit: &str) {
    let mut any = false;
    for (user, count) in ranking.iter().filter(|(_, count)| *count > 0) {
        out.push_str(&format!("{user}: {count} {unit}\n"));
        any = true;
    }
    if !any {
        out.push_str(NOT_AVAILABLE);
        out.push('\n');
    }
}

pub fn render_join_notice(user_id: &str) -> String {
    format!("{user_id} has joined the server.\n")
}

pub fn render_departure_notice(departure: &Departure) -> String {
    format!(
        "{name} has left the server.\n\
         They were originally invited by {inviter} on {joined}.\n\
         They sent a total of {messages} messages.\n\
         They joined a total of {calls} voice calls.\n",
        name = departure.user_id,
        inviter = or_na(departure.invited_by.as_deref()),
        joined = or_na(departure.joined_at.as_deref()),
        messages = departure.messages,
        calls = departure.calls,
    )
}
