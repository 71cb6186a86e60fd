//! Notification model and the per-viewer visibility rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Category of a notification. Only affects presentation.
///
/// Kinds this crate does not know keep their original text so rewriting a shared document
/// never changes them. An empty `Other` stands for a missing `type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Message,
    System,
    Achievement,
    Admin,
    Info,
    Other(String),
}

impl Default for NotificationKind {
    fn default() -> Self {
        NotificationKind::Other(String::new())
    }
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Message => "message",
            NotificationKind::System => "system",
            NotificationKind::Achievement => "achievement",
            NotificationKind::Admin => "admin",
            NotificationKind::Info => "info",
            NotificationKind::Other(raw) => raw,
        }
    }

    /// Parse a stored kind. Unrecognised text is kept verbatim in `Other`.
    pub fn parse(s: &str) -> Self {
        match s {
            "message" => NotificationKind::Message,
            "system" => NotificationKind::System,
            "achievement" => NotificationKind::Achievement,
            "admin" => NotificationKind::Admin,
            "info" => NotificationKind::Info,
            other => NotificationKind::Other(other.to_string()),
        }
    }

    /// Whether the source carried no `type` at all.
    pub fn is_unset(&self) -> bool {
        matches!(self, NotificationKind::Other(raw) if raw.is_empty())
    }

    /// Short human-readable label for list rendering.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Message => "Message",
            NotificationKind::System => "System",
            NotificationKind::Achievement => "Achievement",
            NotificationKind::Admin => "Admin",
            NotificationKind::Info => "Info",
            NotificationKind::Other(_) => "Notification",
        }
    }
}

impl From<String> for NotificationKind {
    fn from(raw: String) -> Self {
        NotificationKind::parse(&raw)
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

/// A single notification addressed to the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "NotificationKind::is_unset"
    )]
    pub kind: NotificationKind,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_admin: Option<bool>,
    /// Fields this crate does not model (priority, adminName, ...), kept across rewrites
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            message: message.into(),
            kind,
            is_read: false,
            created_at: Utc::now(),
            target_role: None,
            from_admin: None,
            extra: Map::new(),
        }
    }

    /// Whether a viewer with `role` may see this notification.
    ///
    /// Untargeted, `"all"`-targeted and admin-sent notifications are visible to everyone;
    /// anything else must match the viewer's role exactly.
    pub fn is_visible_to(&self, role: Option<&str>) -> bool {
        if self.from_admin == Some(true) {
            return true;
        }
        match self.target_role.as_deref() {
            None | Some("") | Some("all") => true,
            Some(target) => role == Some(target),
        }
    }
}

/// A user's notifications together with their unread count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFeed {
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub unread_count: usize,
}

impl NotificationFeed {
    /// Build a feed whose count is derived from the entries.
    pub fn from_notifications(notifications: Vec<Notification>) -> Self {
        let unread_count = count_unread(&notifications);
        Self {
            notifications,
            unread_count,
        }
    }
}

pub fn count_unread(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

/// Request body for creating a notification on the notification service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub from_admin: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn targeted(role: Option<&str>, from_admin: Option<bool>) -> Notification {
        let mut n = Notification::new("n-1", "Contest", "Starts soon", NotificationKind::System);
        n.target_role = role.map(str::to_string);
        n.from_admin = from_admin;
        n
    }

    #[test]
    fn test_visibility_rules() {
        assert!(targeted(None, None).is_visible_to(Some("user")));
        assert!(targeted(Some("all"), None).is_visible_to(None));
        assert!(targeted(Some("user"), None).is_visible_to(Some("user")));
        assert!(!targeted(Some("moderator"), Some(false)).is_visible_to(Some("user")));
        assert!(!targeted(Some("moderator"), None).is_visible_to(None));
        assert!(targeted(Some("moderator"), Some(true)).is_visible_to(Some("user")));
    }

    #[test]
    fn test_deserialize_frontend_shape() {
        let n: Notification = serde_json::from_value(json!({
            "id": "test_1700000000000",
            "title": "Test Notification",
            "message": "Hello",
            "type": "broadcast",
            "priority": "medium",
            "isRead": false,
            "createdAt": "2024-01-01T10:00:00.000Z",
            "fromAdmin": true,
            "adminName": "Test Admin"
        }))
        .unwrap();

        assert_eq!(n.kind, NotificationKind::Other("broadcast".to_string()));
        assert_eq!(n.kind.label(), "Notification");
        assert_eq!(n.from_admin, Some(true));
        assert_eq!(n.extra["priority"], "medium");

        let back = serde_json::to_value(&n).unwrap();
        assert_eq!(back["adminName"], "Test Admin");
        assert_eq!(back["type"], "broadcast");
        assert_eq!(back["isRead"], false);
        assert!(back.get("targetRole").is_none());
    }

    #[test]
    fn test_kind_text_survives_rewrite() {
        for raw in ["broadcast", "contest-reminder", "system"] {
            let n: Notification = serde_json::from_value(json!({
                "id": "a",
                "title": "T",
                "type": raw,
                "createdAt": "2024-01-01T10:00:00Z"
            }))
            .unwrap();
            assert_eq!(serde_json::to_value(&n).unwrap()["type"], raw);
        }

        let untyped: Notification = serde_json::from_value(json!({
            "id": "b",
            "title": "T",
            "createdAt": "2024-01-01T10:00:00Z"
        }))
        .unwrap();
        assert!(untyped.kind.is_unset());
        assert!(serde_json::to_value(&untyped).unwrap().get("type").is_none());
    }

    #[test]
    fn test_feed_counts_unread() {
        let mut read = Notification::new("a", "A", "", NotificationKind::Info);
        read.is_read = true;
        let unread = Notification::new("b", "B", "", NotificationKind::Info);

        let feed = NotificationFeed::from_notifications(vec![read, unread]);
        assert_eq!(feed.unread_count, 1);
    }
}
