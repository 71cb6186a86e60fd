//! User preferences document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;

/// Who can see the user's profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Private,
    Friends,
}

/// Progress of the last save/reset, shown next to the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saving,
    Saved,
    Error,
    Reset,
}

impl SaveStatus {
    /// Terminal states are cleared automatically after a delay.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SaveStatus::Saving)
    }
}

/// Linked third-party account. GitHub and LinkedIn carry a username and profile url,
/// Google carries an email.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    #[serde(default)]
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl SocialAccount {
    fn profile() -> Self {
        Self {
            connected: false,
            username: Some(String::new()),
            email: None,
            url: Some(String::new()),
        }
    }

    fn mailbox() -> Self {
        Self {
            connected: false,
            username: None,
            email: Some(String::new()),
            url: None,
        }
    }

    /// Overlay the fields present in `patch`, keeping the rest.
    pub fn apply(&mut self, patch: &SocialAccountPatch) {
        if let Some(connected) = patch.connected {
            self.connected = connected;
        }
        if let Some(username) = &patch.username {
            self.username = Some(username.clone());
        }
        if let Some(email) = &patch.email {
            self.email = Some(email.clone());
        }
        if let Some(url) = &patch.url {
            self.url = Some(url.clone());
        }
    }
}

/// Partial update for a [`SocialAccount`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccountPatch {
    #[serde(default)]
    pub connected: Option<bool>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// The user's preferences document, persisted whole under `userSettings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    // Account
    pub email: String,
    pub two_factor: bool,
    pub two_factor_secret: String,
    pub social_accounts: BTreeMap<String, SocialAccount>,

    // Editor
    pub font_size: u32,
    pub font_family: String,
    pub tab_size: u32,
    pub word_wrap: bool,
    pub minimap: bool,
    pub line_numbers: bool,
    pub auto_save: bool,
    pub bracket_matching: bool,

    // Notifications
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub sound_enabled: bool,
    pub desktop_notifications: bool,
    pub contest_reminders: bool,
    pub problem_recommendations: bool,

    // Privacy
    pub profile_visibility: ProfileVisibility,
    pub show_email: bool,
    pub show_stats: bool,
    pub show_solved_problems: bool,
    pub show_contest_history: bool,
    pub allow_direct_messages: bool,

    /// Keys written by newer clients, preserved untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults_for(None)
    }
}

impl Settings {
    /// Default document for a session whose identity has `email`.
    pub fn defaults_for(email: Option<&str>) -> Self {
        let social_accounts = BTreeMap::from([
            ("github".to_string(), SocialAccount::profile()),
            ("linkedin".to_string(), SocialAccount::profile()),
            ("google".to_string(), SocialAccount::mailbox()),
        ]);

        Self {
            email: email.unwrap_or_default().to_string(),
            two_factor: false,
            two_factor_secret: String::new(),
            social_accounts,
            font_size: 14,
            font_family: "JetBrains Mono".to_string(),
            tab_size: 4,
            word_wrap: true,
            minimap: true,
            line_numbers: true,
            auto_save: true,
            bracket_matching: true,
            email_notifications: true,
            push_notifications: true,
            sound_enabled: true,
            desktop_notifications: false,
            contest_reminders: true,
            problem_recommendations: true,
            profile_visibility: ProfileVisibility::Public,
            show_email: true,
            show_stats: true,
            show_solved_problems: true,
            show_contest_history: true,
            allow_direct_messages: true,
            extra: Map::new(),
        }
    }

    /// Shallow-merge a persisted document over `defaults`: persisted top-level keys win,
    /// keys only present in the defaults survive. A persisted key whose value does not fit
    /// its field is dropped in favour of the default; every other key is kept.
    pub fn merge_persisted(defaults: &Settings, persisted: Value) -> Result<Settings, StoreError> {
        let Value::Object(overrides) = persisted else {
            return Err(StoreError::Storage(
                "persisted settings are not a JSON object".to_string(),
            ));
        };

        let base = defaults.to_map()?;
        let mut merged = base.clone();
        merged.extend(overrides.clone());
        if let Ok(settings) = serde_json::from_value(Value::Object(merged)) {
            return Ok(settings);
        }

        let mut merged = base;
        for (key, value) in overrides {
            let previous = merged.insert(key.clone(), value);
            if let Err(e) = serde_json::from_value::<Settings>(Value::Object(merged.clone())) {
                tracing::warn!("Ignoring persisted setting `{}`: {}", key, e);
                if let Some(previous) = previous {
                    merged.insert(key, previous);
                } else {
                    merged.remove(&key);
                }
            }
        }
        Ok(serde_json::from_value(Value::Object(merged))?)
    }

    /// Copy of this document with the top-level `key` set to `value`.
    pub fn with_value(&self, key: &str, value: Value) -> Result<Settings, StoreError> {
        let mut map = self.to_map()?;
        map.insert(key.to_string(), value);
        serde_json::from_value(Value::Object(map)).map_err(|e| StoreError::InvalidSetting {
            key: key.to_string(),
            reason: e.to_string(),
        })
    }

    fn to_map(&self) -> Result<Map<String, Value>, StoreError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(StoreError::Storage(
                "settings did not serialize to an object".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_seed_email() {
        let defaults = Settings::defaults_for(Some("ada@example.com"));
        assert_eq!(defaults.email, "ada@example.com");
        assert_eq!(defaults.font_size, 14);
        assert_eq!(defaults.social_accounts["google"].email.as_deref(), Some(""));
        assert_eq!(defaults.social_accounts["github"].username.as_deref(), Some(""));
    }

    #[test]
    fn test_merge_keeps_unspecified_defaults() {
        let defaults = Settings::defaults_for(None);
        let merged = Settings::merge_persisted(&defaults, json!({ "fontSize": 18 })).unwrap();

        assert_eq!(merged.font_size, 18);
        assert_eq!(merged.tab_size, 4);
        assert_eq!(merged.font_family, "JetBrains Mono");
    }

    #[test]
    fn test_merge_preserves_unknown_keys() {
        let defaults = Settings::defaults_for(None);
        let merged = Settings::merge_persisted(
            &defaults,
            json!({ "theme": "dark", "profileVisibility": "friends" }),
        )
        .unwrap();

        assert_eq!(merged.profile_visibility, ProfileVisibility::Friends);
        assert_eq!(merged.extra["theme"], "dark");
        assert_eq!(serde_json::to_value(&merged).unwrap()["theme"], "dark");
    }

    #[test]
    fn test_merge_drops_only_mistyped_keys() {
        let defaults = Settings::defaults_for(None);
        let merged = Settings::merge_persisted(
            &defaults,
            json!({
                "fontSize": "16",
                "lineNumbers": null,
                "tabSize": 2,
                "minimap": false,
                "theme": "dark"
            }),
        )
        .unwrap();

        assert_eq!(merged.font_size, 14);
        assert!(merged.line_numbers);
        assert_eq!(merged.tab_size, 2);
        assert!(!merged.minimap);
        assert_eq!(merged.extra["theme"], "dark");
    }

    #[test]
    fn test_merge_rejects_non_object() {
        let defaults = Settings::defaults_for(None);
        assert!(Settings::merge_persisted(&defaults, json!([1, 2])).is_err());
    }

    #[test]
    fn test_with_value_type_checks() {
        let settings = Settings::default();

        let updated = settings.with_value("tabSize", json!(2)).unwrap();
        assert_eq!(updated.tab_size, 2);

        let err = settings.with_value("tabSize", json!("wide")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidSetting { ref key, .. } if key == "tabSize"));
    }

    #[test]
    fn test_social_patch_merges() {
        let mut account = SocialAccount::default();
        account.apply(&SocialAccountPatch {
            connected: Some(true),
            username: Some("alice".to_string()),
            ..Default::default()
        });
        account.apply(&SocialAccountPatch {
            url: Some("https://github.com/alice".to_string()),
            ..Default::default()
        });

        assert!(account.connected);
        assert_eq!(account.username.as_deref(), Some("alice"));
        assert_eq!(account.url.as_deref(), Some("https://github.com/alice"));
    }
}
