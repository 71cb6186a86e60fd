//! Remote account operations behind the settings page.
//!
//! [`AccountService`] is the single awaited step of every account operation. The store
//! validates input before calling it and mutates state only after it succeeds.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::SocialPlatform;
use crate::auth::API_KEY_HEADER;
use crate::errors::{StoreError, StoreResult};
use crate::models::Settings;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";
const SECRET_LEN: usize = 16;
const ISSUER: &str = "PracticeHub";

/// Secret and authenticator enrollment URI returned when two-factor is turned on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorEnrollment {
    pub secret: String,
    pub qr_code: String,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn save_settings(&self, settings: &Settings) -> StoreResult<()>;

    async fn change_email(&self, new_email: &str, current_password: &str) -> StoreResult<()>;

    /// `account_email` labels the enrollment in authenticator apps.
    async fn enable_two_factor(
        &self,
        password: &str,
        account_email: &str,
    ) -> StoreResult<TwoFactorEnrollment>;

    async fn disable_two_factor(&self, password: &str) -> StoreResult<()>;

    async fn connect_social(
        &self,
        platform: SocialPlatform,
        username: &str,
        password: &str,
    ) -> StoreResult<()>;

    async fn disconnect_social(&self, platform: SocialPlatform) -> StoreResult<()>;
}

/// Random base32 TOTP secret.
pub fn generate_secret() -> String {
    let mut rng = rand::rng();
    (0..SECRET_LEN)
        .map(|_| BASE32_ALPHABET[rng.random_range(0..BASE32_ALPHABET.len())] as char)
        .collect()
}

/// `otpauth://` URI an authenticator app can enroll from.
pub fn enrollment_uri(account_email: &str, secret: &str) -> String {
    format!(
        "otpauth://totp/{issuer}:{account}?secret={secret}&issuer={issuer}",
        issuer = ISSUER,
        account = account_email.replace(' ', "%20"),
        secret = secret,
    )
}

/// Stand-in for the account backend: waits as long as a round-trip would and succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedAccountService {
    quick: Duration,
    slow: Duration,
}

impl Default for SimulatedAccountService {
    fn default() -> Self {
        Self {
            quick: Duration::from_millis(1000),
            slow: Duration::from_millis(1500),
        }
    }
}

impl SimulatedAccountService {
    pub fn with_delays(quick: Duration, slow: Duration) -> Self {
        Self { quick, slow }
    }
}

#[async_trait]
impl AccountService for SimulatedAccountService {
    async fn save_settings(&self, _settings: &Settings) -> StoreResult<()> {
        tokio::time::sleep(self.quick).await;
        Ok(())
    }

    async fn change_email(&self, new_email: &str, _current_password: &str) -> StoreResult<()> {
        tokio::time::sleep(self.slow).await;
        tracing::info!("Simulated email change to {}", new_email);
        Ok(())
    }

    async fn enable_two_factor(
        &self,
        _password: &str,
        account_email: &str,
    ) -> StoreResult<TwoFactorEnrollment> {
        tokio::time::sleep(self.slow).await;
        let secret = generate_secret();
        let qr_code = enrollment_uri(account_email, &secret);
        Ok(TwoFactorEnrollment { secret, qr_code })
    }

    async fn disable_two_factor(&self, _password: &str) -> StoreResult<()> {
        tokio::time::sleep(self.quick).await;
        Ok(())
    }

    async fn connect_social(
        &self,
        platform: SocialPlatform,
        username: &str,
        _password: &str,
    ) -> StoreResult<()> {
        tokio::time::sleep(self.slow).await;
        tracing::info!("Simulated {} connect for {}", platform, username);
        Ok(())
    }

    async fn disconnect_social(&self, _platform: SocialPlatform) -> StoreResult<()> {
        tokio::time::sleep(self.quick).await;
        Ok(())
    }
}

/// Account backend reached over HTTP under `<base>/api/user`.
#[derive(Debug, Clone)]
pub struct HttpAccountService {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpAccountService {
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

    fn request(&self, method: Method, segments: &[&str]) -> StoreResult<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Remote(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "user"])
            .extend(segments);

        let mut request = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        Ok(request)
    }

    async fn execute(&self, request: RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Prefer the service's own message when it sends the error envelope.
        let message = response
            .json::<crate::errors::ErrorResponse>()
            .await
            .map(|body| body.error.message)
            .unwrap_or_else(|_| format!("account service returned {}", status));
        Err(StoreError::Account(message))
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let request = self.request(Method::PUT, &["settings"])?.json(settings);
        self.execute(request).await.map(drop)
    }

    async fn change_email(&self, new_email: &str, current_password: &str) -> StoreResult<()> {
        let request = self
            .request(Method::PUT, &["email"])?
            .json(&json!({ "newEmail": new_email, "password": current_password }));
        self.execute(request).await.map(drop)
    }

    async fn enable_two_factor(
        &self,
        password: &str,
        _account_email: &str,
    ) -> StoreResult<TwoFactorEnrollment> {
        let request = self
            .request(Method::POST, &["2fa", "enable"])?
            .json(&json!({ "password": password }));
        Ok(self.execute(request).await?.json().await?)
    }

    async fn disable_two_factor(&self, password: &str) -> StoreResult<()> {
        let request = self
            .request(Method::POST, &["2fa", "disable"])?
            .json(&json!({ "password": password }));
        self.execute(request).await.map(drop)
    }

    async fn connect_social(
        &self,
        platform: SocialPlatform,
        username: &str,
        password: &str,
    ) -> StoreResult<()> {
        let request = self
            .request(Method::POST, &["connect", platform.as_str()])?
            .json(&json!({ "username": username, "password": password }));
        self.execute(request).await.map(drop)
    }

    async fn disconnect_social(&self, platform: SocialPlatform) -> StoreResult<()> {
        let request = self.request(Method::DELETE, &["connect", platform.as_str()])?;
        self.execute(request).await.map(drop)
    }
}
