//! Local persistent notification store (the fallback path).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::NotificationRepository;
use crate::errors::StoreResult;
use crate::models::{Identity, Notification, NotificationFeed};
use crate::storage::{read_json, write_json, KeyValueStore, NOTIFICATIONS_KEY};

/// One element of the stored array. Elements that do not parse as a [`Notification`] are
/// carried as raw JSON and written back as they were.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Entry {
    Parsed(Notification),
    Raw(Value),
}

impl Entry {
    fn from_value(value: Value) -> Self {
        match serde_json::from_value::<Notification>(value.clone()) {
            Ok(notification) => Entry::Parsed(notification),
            Err(e) => {
                tracing::warn!("Skipping unreadable stored notification: {}", e);
                Entry::Raw(value)
            }
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            Entry::Parsed(n) => Some(&n.id),
            Entry::Raw(value) => value.get("id").and_then(Value::as_str),
        }
    }

    fn mark_read(&mut self) {
        match self {
            Entry::Parsed(n) => n.is_read = true,
            Entry::Raw(Value::Object(fields)) => {
                fields.insert("isRead".to_string(), Value::Bool(true));
            }
            Entry::Raw(_) => {}
        }
    }
}

/// Notifications kept as one JSON array under [`NOTIFICATIONS_KEY`]. The array is shared by
/// everyone using this device, so reads apply the visibility filter for the viewer.
#[derive(Clone)]
pub struct LocalNotificationRepository {
    store: Arc<dyn KeyValueStore>,
}

impl LocalNotificationRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> StoreResult<Vec<Entry>> {
        let raw: Vec<Value> =
            read_json(self.store.as_ref(), NOTIFICATIONS_KEY)?.unwrap_or_default();
        Ok(raw.into_iter().map(Entry::from_value).collect())
    }

    fn save(&self, entries: &[Entry]) -> StoreResult<()> {
        write_json(self.store.as_ref(), NOTIFICATIONS_KEY, entries)
    }

    /// Read-modify-write the whole array.
    fn rewrite(&self, f: impl FnOnce(&mut Vec<Entry>)) -> StoreResult<()> {
        let mut entries = self.load()?;
        f(&mut entries);
        self.save(&entries)
    }

    /// Put `notification` at the head of the stored array.
    pub fn prepend(&self, notification: Notification) -> StoreResult<()> {
        self.rewrite(|all| all.insert(0, Entry::Parsed(notification)))
    }
}

#[async_trait]
impl NotificationRepository for LocalNotificationRepository {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch(&self, viewer: &Identity) -> StoreResult<NotificationFeed> {
        let role = viewer.role.as_deref();
        let visible = self
            .load()?
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Parsed(n) if n.is_visible_to(role) => Some(n),
                _ => None,
            })
            .collect();
        Ok(NotificationFeed::from_notifications(visible))
    }

    async fn mark_read(&self, id: &str) -> StoreResult<()> {
        self.rewrite(|all| {
            if let Some(entry) = all.iter_mut().find(|e| e.id() == Some(id)) {
                entry.mark_read();
            }
        })
    }

    async fn mark_all_read(&self, _user_id: &str) -> StoreResult<()> {
        self.rewrite(|all| all.iter_mut().for_each(Entry::mark_read))
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.rewrite(|all| all.retain(|e| e.id() != Some(id)))
    }

    async fn clear_all(&self, _user_id: &str) -> StoreResult<()> {
        self.save(&[])
    }
}
