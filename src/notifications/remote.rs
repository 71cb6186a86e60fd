//! Notification service client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};

use super::NotificationRepository;
use crate::auth::API_KEY_HEADER;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Identity, NotificationFeed};

/// Talks to the notification service over HTTP. Transport errors, timeouts and non-2xx
/// responses all surface as [`StoreError::Remote`].
#[derive(Debug, Clone)]
pub struct RemoteNotificationRepository {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl RemoteNotificationRepository {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> StoreResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| StoreError::Remote(format!("invalid base url {}: {}", base_url, e)))?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// `<base>/api/notifications/<segments...>`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Remote(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "notifications"])
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: Method, segments: &[&str]) -> StoreResult<Response> {
        let url = self.endpoint(segments)?;
        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Remote(format!(
                "notification service returned {}",
                status
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl NotificationRepository for RemoteNotificationRepository {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, viewer: &Identity) -> StoreResult<NotificationFeed> {
        let response = self.send(Method::GET, &[&viewer.id]).await?;
        Ok(response.json::<NotificationFeed>().await?)
    }

    async fn mark_read(&self, id: &str) -> StoreResult<()> {
        self.send(Method::PUT, &[id, "read"]).await.map(drop)
    }

    async fn mark_all_read(&self, user_id: &str) -> StoreResult<()> {
        self.send(Method::PUT, &[user_id, "mark-all-read"])
            .await
            .map(drop)
    }

    async fn delete(&self, id: &str) -> StoreResult<()> {
        self.send(Method::DELETE, &[id]).await.map(drop)
    }

    async fn clear_all(&self, user_id: &str) -> StoreResult<()> {
        self.send(Method::DELETE, &[user_id, "clear-all"])
            .await
            .map(drop)
    }
}
