//! Notification synchronization.
//!
//! A [`NotificationRepository`] is one backing store for a user's notifications. The
//! remote service and the local persistent store both implement it, and
//! [`FallbackNotificationRepository`] tries the first and falls back to the second on any
//! failure. [`NotificationStore`] owns the in-memory list on top of a repository and
//! [`NotificationPoller`] refreshes it periodically.

mod display;
mod fallback;
mod local;
mod poller;
mod remote;
mod store;

pub use display::*;
pub use fallback::*;
pub use local::*;
pub use poller::*;
pub use remote::*;
pub use store::*;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::errors::StoreResult;
use crate::models::{Identity, NotificationFeed};
use crate::storage::KeyValueStore;

/// A backing store for notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Notifications visible to `viewer`, newest first.
    async fn fetch(&self, viewer: &Identity) -> StoreResult<NotificationFeed>;

    async fn mark_read(&self, id: &str) -> StoreResult<()>;

    async fn mark_all_read(&self, user_id: &str) -> StoreResult<()>;

    async fn delete(&self, id: &str) -> StoreResult<()>;

    async fn clear_all(&self, user_id: &str) -> StoreResult<()>;
}

/// Pick the repository for a session: remote-with-local-fallback when a service URL is
/// configured, local-only otherwise.
pub fn repository_from_config(
    config: &Config,
    local: LocalNotificationRepository,
) -> StoreResult<Arc<dyn NotificationRepository>> {
    let local: Arc<dyn NotificationRepository> = Arc::new(local);

    let Some(base_url) = &config.api_base_url else {
        tracing::info!("No notification service configured, using local storage only");
        return Ok(local);
    };

    let remote = RemoteNotificationRepository::new(
        base_url,
        config.api_key.clone(),
        config.request_timeout,
    )?;
    Ok(Arc::new(FallbackNotificationRepository::new(
        Arc::new(remote),
        local,
    )))
}

/// Convenience for building the local repository over a key-value store.
pub fn local_repository(store: Arc<dyn KeyValueStore>) -> LocalNotificationRepository {
    LocalNotificationRepository::new(store)
}
