//! Settings document state for the signed-in user.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::{AccountService, EditorPresentation, EditorPresenter, SocialPlatform};
use crate::errors::{StoreError, StoreResult};
use crate::models::{Identity, SaveStatus, Settings, SocialAccount, SocialAccountPatch};
use crate::storage::{read_json, write_json, KeyValueStore, SETTINGS_KEY};

/// Category whose keys address one social provider each.
pub const SOCIAL_ACCOUNTS: &str = "socialAccounts";

/// Outcome of a successful account operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResult {
    pub success: bool,
    pub message: String,
}

impl AccountResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// What the user needs to finish two-factor enrollment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoFactorSetup {
    pub success: bool,
    pub message: String,
    pub secret: String,
    pub qr_code: String,
}

struct State {
    settings: Settings,
    defaults: Settings,
    /// Last identity email written into the document.
    identity_email: Option<String>,
    applied_editor: EditorPresentation,
    busy: usize,
    save_status: Option<SaveStatus>,
    /// Bumped on every status change so a stale auto-clear leaves newer statuses alone.
    status_seq: u64,
}

struct Inner {
    kv: Arc<dyn KeyValueStore>,
    account: Arc<dyn AccountService>,
    presenter: Arc<dyn EditorPresenter>,
    status_clear_delay: Duration,
    state: Mutex<State>,
}

/// Owns the preferences document.
///
/// Every mutation persists the whole resulting document before it becomes visible. Account
/// operations validate their input first, await the account service once, and only then
/// touch the document; their failures are returned to the caller.
#[derive(Clone)]
pub struct SettingsStore {
    inner: Arc<Inner>,
}

/// Counts an account operation as in flight for as long as it lives.
struct Busy<'a>(&'a SettingsStore);

impl Drop for Busy<'_> {
    fn drop(&mut self) {
        let mut state = self.0.state();
        state.busy = state.busy.saturating_sub(1);
    }
}

impl SettingsStore {
    /// Build defaults from `identity`, merge the persisted document over them and apply the
    /// editor presentation.
    pub fn initialize(
        kv: Arc<dyn KeyValueStore>,
        account: Arc<dyn AccountService>,
        presenter: Arc<dyn EditorPresenter>,
        identity: Option<&Identity>,
        status_clear_delay: Duration,
    ) -> Self {
        let defaults = Settings::defaults_for(identity.and_then(|i| i.email.as_deref()));

        let persisted = read_json::<Value>(kv.as_ref(), SETTINGS_KEY)
            .and_then(|doc| doc.map(|doc| Settings::merge_persisted(&defaults, doc)).transpose());
        let settings = match persisted {
            Ok(Some(settings)) => settings,
            Ok(None) => defaults.clone(),
            Err(e) => {
                tracing::error!("Error loading settings, using defaults: {}", e);
                defaults.clone()
            }
        };

        let applied_editor = EditorPresentation::from(&settings);
        presenter.apply(&applied_editor);

        let store = Self {
            inner: Arc::new(Inner {
                kv,
                account,
                presenter,
                status_clear_delay,
                state: Mutex::new(State {
                    settings,
                    defaults,
                    identity_email: None,
                    applied_editor,
                    busy: 0,
                    save_status: None,
                    status_seq: 0,
                }),
            }),
        };
        store.sync_identity(identity);
        store
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn busy(&self) -> Busy<'_> {
        self.state().busy += 1;
        Busy(self)
    }

    // ==================== READS ====================

    pub fn settings(&self) -> Settings {
        self.state().settings.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().busy > 0
    }

    pub fn save_status(&self) -> Option<SaveStatus> {
        self.state().save_status
    }

    // ==================== IDENTITY ====================

    /// Copy the identity's email into the document when it differs from the last one seen.
    pub fn sync_identity(&self, identity: Option<&Identity>) {
        let Some(email) = identity.and_then(|i| i.email.as_deref()) else {
            return;
        };

        let mut state = self.state();
        if state.identity_email.as_deref() == Some(email) {
            return;
        }
        state.identity_email = Some(email.to_string());
        state.settings.email = email.to_string();
        state.defaults.email = email.to_string();
    }

    /// Undo the editor presentation installed by this store.
    pub fn teardown(&self) {
        self.inner.presenter.clear();
    }

    // ==================== LOCAL MUTATIONS ====================

    /// Apply `f` to a copy of the document, persist the copy, then publish it.
    fn commit(&self, f: impl FnOnce(&mut Settings) -> StoreResult<()>) -> StoreResult<()> {
        let changed_editor = {
            let mut state = self.state();
            let mut next = state.settings.clone();
            f(&mut next)?;
            write_json(self.inner.kv.as_ref(), SETTINGS_KEY, &next)?;
            state.settings = next;

            let editor = EditorPresentation::from(&state.settings);
            if editor == state.applied_editor {
                None
            } else {
                state.applied_editor = editor.clone();
                Some(editor)
            }
        };

        if let Some(editor) = changed_editor {
            self.inner.presenter.apply(&editor);
        }
        Ok(())
    }

    /// Set one setting. For [`SOCIAL_ACCOUNTS`] `key` names a provider whose whole entry is
    /// replaced by `value`; for any other category `key` is a top-level field.
    pub fn update_setting(&self, category: &str, key: &str, value: Value) -> StoreResult<()> {
        tracing::debug!("updateSetting {}.{} = {}", category, key, value);

        self.commit(|settings| {
            if category == SOCIAL_ACCOUNTS {
                let account: SocialAccount =
                    serde_json::from_value(value).map_err(|e| StoreError::InvalidSetting {
                        key: format!("{}.{}", SOCIAL_ACCOUNTS, key),
                        reason: e.to_string(),
                    })?;
                settings.social_accounts.insert(key.to_string(), account);
            } else {
                *settings = settings.with_value(key, value)?;
            }
            Ok(())
        })
    }

    /// Merge `updates` into the entry for `platform`, keeping fields it leaves out.
    pub fn update_social_account(
        &self,
        platform: &str,
        updates: &SocialAccountPatch,
    ) -> StoreResult<()> {
        self.commit(|settings| {
            settings
                .social_accounts
                .entry(platform.to_string())
                .or_default()
                .apply(updates);
            Ok(())
        })
    }

    /// Restore the defaults and re-apply the editor presentation.
    pub fn reset_settings(&self) -> StoreResult<()> {
        let reset = {
            let mut state = self.state();
            let defaults = state.defaults.clone();
            write_json(self.inner.kv.as_ref(), SETTINGS_KEY, &defaults).map(|()| {
                state.settings = defaults;
                state.applied_editor = EditorPresentation::from(&state.settings);
                state.applied_editor.clone()
            })
        };

        match reset {
            Ok(editor) => {
                self.inner.presenter.apply(&editor);
                tracing::info!("Settings reset to defaults");
                self.set_status(SaveStatus::Reset);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error resetting settings: {}", e);
                self.set_status(SaveStatus::Error);
                Err(e)
            }
        }
    }

    // ==================== SAVE STATUS ====================

    fn set_status(&self, status: SaveStatus) {
        let seq = {
            let mut state = self.state();
            state.save_status = Some(status);
            state.status_seq += 1;
            state.status_seq
        };
        if status.is_terminal() {
            self.schedule_status_clear(seq);
        }
    }

    fn schedule_status_clear(&self, seq: u64) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, save status will not auto-clear");
            return;
        };

        let inner = Arc::downgrade(&self.inner);
        let delay = self.inner.status_clear_delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                let mut state = inner.state.lock().unwrap_or_else(PoisonError::into_inner);
                if state.status_seq == seq {
                    state.save_status = None;
                }
            }
        });
    }

    // ==================== ACCOUNT OPERATIONS ====================

    /// Persist locally, push to the account service, and report the outcome through the
    /// save status.
    pub async fn save_settings(&self) -> SaveStatus {
        let _busy = self.busy();
        self.set_status(SaveStatus::Saving);

        let snapshot = self.settings();
        let result = match write_json(self.inner.kv.as_ref(), SETTINGS_KEY, &snapshot) {
            Ok(()) => self.inner.account.save_settings(&snapshot).await,
            Err(e) => Err(e),
        };

        let status = match result {
            Ok(()) => {
                tracing::info!("Settings saved");
                SaveStatus::Saved
            }
            Err(e) => {
                tracing::error!("Error saving settings: {}", e);
                SaveStatus::Error
            }
        };
        self.set_status(status);
        status
    }

    pub async fn change_email(
        &self,
        new_email: &str,
        current_password: &str,
        confirm_password: &str,
    ) -> StoreResult<AccountResult> {
        if current_password != confirm_password {
            return Err(StoreError::PasswordMismatch);
        }

        let _busy = self.busy();
        self.inner
            .account
            .change_email(new_email, current_password)
            .await?;

        self.commit(|settings| {
            settings.email = new_email.to_string();
            Ok(())
        })?;
        tracing::info!("Email changed to {}", new_email);
        Ok(AccountResult::ok("Email updated successfully"))
    }

    pub async fn enable_two_factor(
        &self,
        password: &str,
        confirm_password: &str,
    ) -> StoreResult<TwoFactorSetup> {
        if password != confirm_password {
            return Err(StoreError::PasswordMismatch);
        }

        let _busy = self.busy();
        let email = self.state().settings.email.clone();
        let enrollment = self
            .inner
            .account
            .enable_two_factor(password, &email)
            .await?;

        self.commit(|settings| {
            settings.two_factor = true;
            settings.two_factor_secret = enrollment.secret.clone();
            Ok(())
        })?;
        tracing::info!("Two-factor authentication enabled");
        Ok(TwoFactorSetup {
            success: true,
            message: "Two-factor authentication enabled".to_string(),
            secret: enrollment.secret,
            qr_code: enrollment.qr_code,
        })
    }

    pub async fn disable_two_factor(&self, password: &str) -> StoreResult<AccountResult> {
        let _busy = self.busy();
        self.inner.account.disable_two_factor(password).await?;

        self.commit(|settings| {
            settings.two_factor = false;
            settings.two_factor_secret.clear();
            Ok(())
        })?;
        tracing::info!("Two-factor authentication disabled");
        Ok(AccountResult::ok("Two-factor authentication disabled"))
    }

    pub async fn connect_social_account(
        &self,
        platform: &str,
        username: &str,
        password: &str,
    ) -> StoreResult<AccountResult> {
        let platform: SocialPlatform = platform.parse()?;

        let _busy = self.busy();
        self.inner
            .account
            .connect_social(platform, username, password)
            .await?;

        self.update_social_account(platform.as_str(), &platform.connected_patch(username))?;
        Ok(AccountResult::ok(format!(
            "{} account connected successfully",
            platform
        )))
    }

    pub async fn disconnect_social_account(&self, platform: &str) -> StoreResult<AccountResult> {
        let platform: SocialPlatform = platform.parse()?;

        let _busy = self.busy();
        self.inner.account.disconnect_social(platform).await?;

        self.update_social_account(platform.as_str(), &platform.disconnected_patch())?;
        Ok(AccountResult::ok(format!("{} account disconnected", platform)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{CssVariables, TwoFactorEnrollment};
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    const CLEAR: Duration = Duration::from_secs(3);

    /// Account service that answers instantly and records what it was asked.
    #[derive(Default)]
    struct FakeAccount {
        fail: AtomicBool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeAccount {
        fn outcome(&self, call: &str) -> StoreResult<()> {
            self.calls.lock().unwrap().push(call.to_string());
            if self.fail.load(Ordering::SeqCst) {
                return Err(StoreError::Account(format!("{} failed", call)));
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AccountService for FakeAccount {
        async fn save_settings(&self, _settings: &Settings) -> StoreResult<()> {
            self.outcome("save")
        }
        async fn change_email(&self, _new_email: &str, _password: &str) -> StoreResult<()> {
            self.outcome("email")
        }
        async fn enable_two_factor(
            &self,
            _password: &str,
            _email: &str,
        ) -> StoreResult<TwoFactorEnrollment> {
            self.outcome("2fa-enable")?;
            Ok(TwoFactorEnrollment {
                secret: "JBSWY3DPEHPK3PXP".to_string(),
                qr_code: "otpauth://totp/test".to_string(),
            })
        }
        async fn disable_two_factor(&self, _password: &str) -> StoreResult<()> {
            self.outcome("2fa-disable")
        }
        async fn connect_social(
            &self,
            platform: SocialPlatform,
            _username: &str,
            _password: &str,
        ) -> StoreResult<()> {
            self.outcome(&format!("connect-{}", platform))
        }
        async fn disconnect_social(&self, platform: SocialPlatform) -> StoreResult<()> {
            self.outcome(&format!("disconnect-{}", platform))
        }
    }

    struct Fixture {
        kv: Arc<MemoryStore>,
        account: Arc<FakeAccount>,
        css: Arc<CssVariables>,
        store: SettingsStore,
    }

    impl Fixture {
        fn new(persisted: Option<Value>) -> Self {
            let kv = Arc::new(MemoryStore::new());
            if let Some(doc) = persisted {
                kv.set(SETTINGS_KEY, &doc.to_string()).unwrap();
            }
            let account = Arc::new(FakeAccount::default());
            let css = Arc::new(CssVariables::new());
            let identity = Identity::new("u-1").with_email("ada@example.com");
            let store = SettingsStore::initialize(
                kv.clone(),
                account.clone(),
                css.clone(),
                Some(&identity),
                CLEAR,
            );
            Self {
                kv,
                account,
                css,
                store,
            }
        }

        fn persisted(&self) -> Option<Value> {
            read_json(self.kv.as_ref() as &dyn KeyValueStore, SETTINGS_KEY).unwrap()
        }
    }

    #[test]
    fn test_initialize_merges_persisted_over_defaults() {
        let fx = Fixture::new(Some(json!({ "fontSize": 18, "theme": "dark" })));
        let settings = fx.store.settings();

        assert_eq!(settings.font_size, 18);
        assert_eq!(settings.tab_size, 4);
        assert_eq!(settings.extra["theme"], "dark");
        assert_eq!(fx.css.get("--editor-font-size").as_deref(), Some("18px"));
    }

    #[test]
    fn test_mistyped_key_does_not_discard_the_rest() {
        let fx = Fixture::new(Some(json!({
            "fontSize": "16",
            "tabSize": 2,
            "minimap": false,
            "theme": "dark"
        })));

        let settings = fx.store.settings();
        assert_eq!(settings.font_size, 14);
        assert_eq!(settings.tab_size, 2);
        assert!(!settings.minimap);
        assert_eq!(settings.extra["theme"], "dark");

        fx.store
            .update_setting("privacy", "showEmail", json!(false))
            .unwrap();

        let doc = fx.persisted().unwrap();
        assert_eq!(doc["tabSize"], 2);
        assert_eq!(doc["minimap"], false);
        assert_eq!(doc["theme"], "dark");
        assert_eq!(doc["fontSize"], 14);
        assert_eq!(doc["showEmail"], false);
    }

    #[test]
    fn test_initialize_ignores_corrupt_document() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(SETTINGS_KEY, "{oops").unwrap();
        let store = SettingsStore::initialize(
            kv,
            Arc::new(FakeAccount::default()),
            Arc::new(CssVariables::new()),
            None,
            CLEAR,
        );

        assert_eq!(store.settings(), Settings::defaults_for(None));
    }

    #[test]
    fn test_identity_email_wins_and_resyncs() {
        let fx = Fixture::new(Some(json!({ "email": "stale@example.com" })));
        assert_eq!(fx.store.settings().email, "ada@example.com");

        let renamed = Identity::new("u-1").with_email("ada@new.example.com");
        fx.store.sync_identity(Some(&renamed));
        assert_eq!(fx.store.settings().email, "ada@new.example.com");

        fx.store.sync_identity(None);
        assert_eq!(fx.store.settings().email, "ada@new.example.com");
    }

    #[test]
    fn test_update_flat_setting_persists() {
        let fx = Fixture::new(None);

        fx.store.update_setting("editor", "tabSize", json!(2)).unwrap();

        assert_eq!(fx.store.settings().tab_size, 2);
        assert_eq!(fx.persisted().unwrap()["tabSize"], 2);
        assert_eq!(fx.css.get("--editor-tab-size").as_deref(), Some("2"));
    }

    #[test]
    fn test_update_setting_rejects_wrong_type() {
        let fx = Fixture::new(None);

        let err = fx
            .store
            .update_setting("privacy", "profileVisibility", json!("everyone"))
            .unwrap_err();

        assert!(matches!(err, StoreError::InvalidSetting { .. }));
        assert_eq!(
            fx.store.settings().profile_visibility,
            crate::models::ProfileVisibility::Public
        );
        assert!(fx.persisted().is_none());
    }

    #[test]
    fn test_update_setting_replaces_one_provider() {
        let fx = Fixture::new(None);

        fx.store
            .update_setting(SOCIAL_ACCOUNTS, "github", json!({ "connected": true }))
            .unwrap();

        let accounts = fx.store.settings().social_accounts;
        assert!(accounts["github"].connected);
        assert_eq!(accounts["github"].username, None);
        assert_eq!(accounts["linkedin"].username.as_deref(), Some(""));
        assert_eq!(accounts["google"].email.as_deref(), Some(""));
    }

    #[test]
    fn test_update_social_account_merges() {
        let fx = Fixture::new(None);

        fx.store
            .update_social_account(
                "github",
                &SocialAccountPatch {
                    connected: Some(true),
                    username: Some("alice".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        fx.store
            .update_social_account(
                "github",
                &SocialAccountPatch {
                    url: Some("https://github.com/alice".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let github = &fx.store.settings().social_accounts["github"];
        assert!(github.connected);
        assert_eq!(github.username.as_deref(), Some("alice"));
        assert_eq!(github.url.as_deref(), Some("https://github.com/alice"));
        assert_eq!(
            fx.persisted().unwrap()["socialAccounts"]["github"]["username"],
            "alice"
        );
    }

    #[tokio::test]
    async fn test_change_email_mismatch_touches_nothing() {
        let fx = Fixture::new(None);

        let err = fx
            .store
            .change_email("new@x.com", "p1", "p2")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::PasswordMismatch));
        assert_eq!(fx.store.settings().email, "ada@example.com");
        assert!(fx.persisted().is_none());
        assert!(fx.account.calls().is_empty());
    }

    #[tokio::test]
    async fn test_change_email_persists() {
        let fx = Fixture::new(None);

        let result = fx
            .store
            .change_email("new@x.com", "secret", "secret")
            .await
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, "Email updated successfully");
        assert_eq!(fx.persisted().unwrap()["email"], "new@x.com");
        assert!(!fx.store.is_loading());

        // Same identity again keeps the explicitly chosen address.
        let identity = Identity::new("u-1").with_email("ada@example.com");
        fx.store.sync_identity(Some(&identity));
        assert_eq!(fx.store.settings().email, "new@x.com");
    }

    #[tokio::test]
    async fn test_account_failure_propagates() {
        let fx = Fixture::new(None);
        fx.account.fail.store(true, Ordering::SeqCst);

        let err = fx
            .store
            .change_email("new@x.com", "secret", "secret")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "email failed");
        assert_eq!(fx.store.settings().email, "ada@example.com");

        assert!(fx.store.connect_social_account("github", "alice", "pw").await.is_err());
        assert!(!fx.store.settings().social_accounts["github"].connected);
        assert!(!fx.store.is_loading());
    }

    #[tokio::test]
    async fn test_two_factor_lifecycle() {
        let fx = Fixture::new(None);

        let err = fx.store.enable_two_factor("a", "b").await.unwrap_err();
        assert!(matches!(err, StoreError::PasswordMismatch));
        assert!(!fx.store.settings().two_factor);

        let setup = fx.store.enable_two_factor("pw", "pw").await.unwrap();
        assert_eq!(setup.secret, "JBSWY3DPEHPK3PXP");
        assert!(!setup.qr_code.is_empty());
        let settings = fx.store.settings();
        assert!(settings.two_factor);
        assert_eq!(settings.two_factor_secret, "JBSWY3DPEHPK3PXP");

        fx.store.disable_two_factor("pw").await.unwrap();
        let settings = fx.store.settings();
        assert!(!settings.two_factor);
        assert!(settings.two_factor_secret.is_empty());
        assert_eq!(fx.persisted().unwrap()["twoFactor"], false);
    }

    #[tokio::test]
    async fn test_connect_and_disconnect_social() {
        let fx = Fixture::new(None);

        let result = fx
            .store
            .connect_social_account("github", "alice", "pw")
            .await
            .unwrap();
        assert_eq!(result.message, "github account connected successfully");

        let github = fx.store.settings().social_accounts["github"].clone();
        assert!(github.connected);
        assert_eq!(github.url.as_deref(), Some("https://github.com/alice"));

        let result = fx.store.disconnect_social_account("github").await.unwrap();
        assert_eq!(result.message, "github account disconnected");
        let github = fx.store.settings().social_accounts["github"].clone();
        assert!(!github.connected);
        assert_eq!(github.username.as_deref(), Some(""));
        assert_eq!(github.url.as_deref(), Some(""));

        let err = fx
            .store
            .connect_social_account("myspace", "alice", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownPlatform(_)));
        assert_eq!(
            fx.account.calls(),
            vec!["connect-github", "disconnect-github"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_status_auto_clears() {
        let fx = Fixture::new(None);

        assert_eq!(fx.store.save_settings().await, SaveStatus::Saved);
        assert_eq!(fx.store.save_status(), Some(SaveStatus::Saved));
        assert!(fx.persisted().is_some());

        tokio::time::sleep(CLEAR + Duration::from_millis(1)).await;
        assert_eq!(fx.store.save_status(), None);

        fx.account.fail.store(true, Ordering::SeqCst);
        assert_eq!(fx.store.save_settings().await, SaveStatus::Error);
        assert_eq!(fx.store.save_status(), Some(SaveStatus::Error));

        tokio::time::sleep(CLEAR + Duration::from_millis(1)).await;
        assert_eq!(fx.store.save_status(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_clear_keeps_newer_status() {
        let fx = Fixture::new(None);

        fx.store.save_settings().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        fx.store.reset_settings().unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(fx.store.save_status(), Some(SaveStatus::Reset));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(fx.store.save_status(), None);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let fx = Fixture::new(Some(json!({ "fontSize": 20, "minimap": false })));

        fx.store.reset_settings().unwrap();

        let settings = fx.store.settings();
        assert_eq!(settings, Settings::defaults_for(Some("ada@example.com")));
        assert_eq!(fx.persisted().unwrap()["fontSize"], 14);
        assert_eq!(fx.css.get("--editor-font-size").as_deref(), Some("14px"));
        assert_eq!(fx.store.save_status(), Some(SaveStatus::Reset));

        fx.store.teardown();
        assert!(fx.css.get("--editor-font-size").is_none());
    }
}
