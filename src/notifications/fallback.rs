//! Remote-first repository resolver.

use std::sync::Arc;

use async_trait::async_trait;

use super::NotificationRepository;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Identity, NotificationFeed};

/// Runs every operation against `primary`, retrying it on `fallback` when `primary` fails
/// for any reason.
#[derive(Clone)]
pub struct FallbackNotificationRepository {
    primary: Arc<dyn NotificationRepository>,
    fallback: Arc<dyn NotificationRepository>,
}

impl FallbackNotificationRepository {
    pub fn new(
        primary: Arc<dyn NotificationRepository>,
        fallback: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { primary, fallback }
    }

    fn falling_back(&self, operation: &str, err: &StoreError) {
        tracing::debug!(
            "{} unavailable for {} ({}), using {}",
            self.primary.name(),
            operation,
            err,
            self.fallback.name()
        );
    }
}

#[async_trait]
impl NotificationRepository for FallbackNotificationRepository {
    fn name(&self) -> &'static str {
        "remote+local"
    }

    async fn fetch(&self, viewer: &Identity) -> StoreResult<NotificationFeed> {
        match self.primary.fetch(viewer).await {
            Ok(feed) => Ok(feed),
            Err(e) => {
                self.falling_back("fetch", &e);
                self.fallback.fetch(viewer).await
            }
        }
    }

    async fn mark_read(&self, id: &str) -> StoreResult<()> {
        match self.primary.mark_read(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.falling_back("mark_read", &e);
                self.fallback.mark_read(id).await
            }
        }
    }

    async fn mark_all_read(&self, user_id: &str) -> StoreResult<()> {
        match self.primary.mark_all_read(user_id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.falling_back("mark_all_read", &e);
                self.fallback.mark_all_read(user_id).await
            }
        }
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        match self.primary.delete(id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.falling_back("delete", &e);
                self.fallback.delete(id).await
            }
        }
    }

    async fn clear_all(&self, user_id: &str) -> StoreResult<()> {
        match self.primary.clear_all(user_id).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.falling_back("clear_all", &e);
                self.fallback.clear_all(user_id).await
            }
        }
    }
}
