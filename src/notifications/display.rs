//! Formatting helpers for the notification dropdown.

use chrono::{DateTime, Utc};

use crate::models::Notification;

/// Entries shown before the list is expanded.
pub const PREVIEW_LIMIT: usize = 5;

/// Relative age of a notification: "Just now", "5m ago", "3h ago", "2d ago".
pub fn format_time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    match seconds {
        s if s < 60 => "Just now".to_string(),
        s if s < 3_600 => format!("{}m ago", s / 60),
        s if s < 86_400 => format!("{}h ago", s / 3_600),
        s => format!("{}d ago", s / 86_400),
    }
}

/// Text for the bell badge; `None` hides the badge.
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        1..=99 => Some(unread.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// The entries to render: the first [`PREVIEW_LIMIT`] unless the list is expanded.
pub fn preview(notifications: &[Notification], show_all: bool) -> &[Notification] {
    if show_all {
        notifications
    } else {
        &notifications[..notifications.len().min(PREVIEW_LIMIT)]
    }
}
