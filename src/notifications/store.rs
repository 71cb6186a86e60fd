//! In-memory notification state for the signed-in user.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{LocalNotificationRepository, NotificationRepository};
use crate::errors::StoreResult;
use crate::models::{count_unread, Identity, Notification, NotificationFeed};

/// Receives the bell-shake / sound cue whenever the unread count changes to a positive value.
pub trait UnreadAlert: Send + Sync {
    fn notify(&self, unread: usize, play_sound: bool);
}

/// Alert that only logs, used when nothing is listening.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlert;

impl UnreadAlert for LogAlert {
    fn notify(&self, unread: usize, play_sound: bool) {
        tracing::info!(unread, play_sound, "unread notifications");
    }
}

/// Point-in-time view of the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationSnapshot {
    pub notifications: Vec<Notification>,
    pub unread_count: usize,
    pub loading: bool,
}

#[derive(Default)]
struct State {
    viewer: Option<Identity>,
    /// Bumped on every identity change; results started under an older value are dropped.
    generation: u64,
    notifications: Vec<Notification>,
    unread_count: usize,
    fetches_in_flight: usize,
}

impl State {
    /// Recompute the unread cache, returning the new count if an alert is due.
    fn reconcile(&mut self) -> Option<usize> {
        let previous = self.unread_count;
        self.unread_count = count_unread(&self.notifications);
        (self.unread_count > 0 && self.unread_count != previous).then_some(self.unread_count)
    }

    fn reset(&mut self) {
        self.notifications.clear();
        self.unread_count = 0;
    }
}

struct Inner {
    repo: Arc<dyn NotificationRepository>,
    local: LocalNotificationRepository,
    alert: Arc<dyn UnreadAlert>,
    sound_enabled: AtomicBool,
    state: Mutex<State>,
}

/// Counts a fetch as in flight until dropped, including when the fetch future is cancelled.
struct InFlight<'a>(&'a NotificationStore);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.0.state();
        state.fetches_in_flight = state.fetches_in_flight.saturating_sub(1);
    }
}

/// Owns the notification list of the current session.
///
/// Failures of the backing repository are logged and absorbed: callers only ever observe
/// an empty or stale list, never an error. Each fetch replaces the list wholesale, so a
/// poll that resolves after an optimistic mutation overwrites it with the repository's view.
#[derive(Clone)]
pub struct NotificationStore {
    inner: Arc<Inner>,
}

impl NotificationStore {
    pub fn new(repo: Arc<dyn NotificationRepository>, local: LocalNotificationRepository) -> Self {
        Self {
            inner: Arc::new(Inner {
                repo,
                local,
                alert: Arc::new(LogAlert),
                sound_enabled: AtomicBool::new(true),
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Replace the alert sink. Only valid before the store is shared.
    pub fn with_alert(self, alert: Arc<dyn UnreadAlert>) -> Self {
        let inner = match Arc::try_unwrap(self.inner) {
            Ok(inner) => inner,
            Err(shared) => {
                tracing::warn!("with_alert called on a shared store, alert not replaced");
                return Self { inner: shared };
            }
        };
        Self {
            inner: Arc::new(Inner { alert, ..inner }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn in_flight(&self) -> InFlight<'_> {
        self.state().fetches_in_flight += 1;
        InFlight(self)
    }

    fn alert(&self, due: Option<usize>) {
        if let Some(unread) = due {
            self.inner.alert.notify(unread, self.sound_enabled());
        }
    }

    // ==================== SESSION ====================

    /// Switch the session identity. A different identity discards the current list and
    /// invalidates any request still in flight for the previous one.
    pub fn set_viewer(&self, viewer: Option<Identity>) {
        let mut state = self.state();
        if state.viewer == viewer {
            return;
        }
        tracing::debug!(
            "Notification viewer changed to {:?}",
            viewer.as_ref().map(|v| v.id.as_str())
        );
        state.viewer = viewer;
        state.generation += 1;
        state.reset();
    }

    pub fn viewer(&self) -> Option<Identity> {
        self.state().viewer.clone()
    }

    /// Viewer and generation, or `None` when signed out.
    fn session(&self) -> Option<(Identity, u64)> {
        let state = self.state();
        state.viewer.clone().map(|v| (v, state.generation))
    }

    /// Apply `f` if the session is still the one an operation started under.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut State)) {
        let due = {
            let mut state = self.state();
            if state.generation != generation {
                tracing::debug!("Discarding notification result from a previous session");
                return;
            }
            f(&mut state);
            state.reconcile()
        };
        self.alert(due);
    }

    // ==================== READS ====================

    pub fn snapshot(&self) -> NotificationSnapshot {
        let state = self.state();
        NotificationSnapshot {
            notifications: state.notifications.clone(),
            unread_count: state.unread_count,
            loading: state.fetches_in_flight > 0,
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.state().notifications.clone()
    }

    pub fn unread_count(&self) -> usize {
        self.state().unread_count
    }

    pub fn is_loading(&self) -> bool {
        self.state().fetches_in_flight > 0
    }

    pub fn sound_enabled(&self) -> bool {
        self.inner.sound_enabled.load(Ordering::Relaxed)
    }

    pub fn set_sound_enabled(&self, enabled: bool) {
        self.inner.sound_enabled.store(enabled, Ordering::Relaxed);
    }

    // ==================== OPERATIONS ====================

    /// Reload the list from the repository. No-op while signed out.
    pub async fn fetch(&self) {
        let Some((viewer, generation)) = self.session() else {
            return;
        };

        let in_flight = self.in_flight();
        let feed = match self.inner.repo.fetch(&viewer).await {
            Ok(feed) => feed,
            Err(e) => {
                tracing::warn!("Error fetching notifications for {}: {}", viewer.id, e);
                NotificationFeed::default()
            }
        };
        drop(in_flight);

        if feed.unread_count != count_unread(&feed.notifications) {
            tracing::debug!(
                "Repository reported {} unread, list holds {}",
                feed.unread_count,
                count_unread(&feed.notifications)
            );
        }

        self.apply(generation, |state| state.notifications = feed.notifications);
    }

    /// Same as [`fetch`](Self::fetch); kept for manual refresh triggers.
    pub async fn refresh(&self) {
        tracing::debug!("Manually refreshing notifications");
        self.fetch().await;
    }

    pub async fn mark_as_read(&self, id: &str) {
        let Some((_, generation)) = self.session() else {
            return;
        };

        if let Err(e) = self.inner.repo.mark_read(id).await {
            tracing::warn!("Error marking notification {} as read: {}", id, e);
        }

        self.apply(generation, |state| {
            if let Some(n) = state.notifications.iter_mut().find(|n| n.id == id) {
                n.is_read = true;
            }
        });
    }

    pub async fn mark_all_as_read(&self) {
        let Some((viewer, generation)) = self.session() else {
            return;
        };

        if let Err(e) = self.inner.repo.mark_all_read(&viewer.id).await {
            tracing::warn!("Error marking all notifications as read: {}", e);
        }

        self.apply(generation, |state| {
            state.notifications.iter_mut().for_each(|n| n.is_read = true);
        });
    }

    pub async fn delete_notification(&self, id: &str) {
        let Some((_, generation)) = self.session() else {
            return;
        };

        if let Err(e) = self.inner.repo.delete(id).await {
            tracing::warn!("Error deleting notification {}: {}", id, e);
        }

        self.apply(generation, |state| state.notifications.retain(|n| n.id != id));
    }

    pub async fn clear_all(&self) {
        let Some((viewer, generation)) = self.session() else {
            return;
        };

        if let Err(e) = self.inner.repo.clear_all(&viewer.id).await {
            tracing::warn!("Error clearing notifications: {}", e);
        }

        self.apply(generation, State::reset);
    }

    /// Store `notification` in the local persistent store and reload.
    pub async fn add_local_notification(&self, notification: Notification) -> StoreResult<()> {
        tracing::debug!("Adding local notification {}", notification.id);
        self.inner.local.prepend(notification)?;
        self.fetch().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use crate::storage::{write_json, KeyValueStore, MemoryStore, NOTIFICATIONS_KEY};

    #[derive(Default)]
    struct RecordingAlert {
        calls: Mutex<Vec<(usize, bool)>>,
    }

    impl UnreadAlert for RecordingAlert {
        fn notify(&self, unread: usize, play_sound: bool) {
            self.calls.lock().unwrap().push((unread, play_sound));
        }
    }

    fn notification(id: &str, is_read: bool) -> Notification {
        let mut n = Notification::new(id, "Title", "Body", NotificationKind::Info);
        n.is_read = is_read;
        n
    }

    fn local_store(seed: &[Notification]) -> (NotificationStore, Arc<RecordingAlert>) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        write_json(kv.as_ref(), NOTIFICATIONS_KEY, seed).unwrap();
        let local = LocalNotificationRepository::new(kv);
        let alert = Arc::new(RecordingAlert::default());
        let store =
            NotificationStore::new(Arc::new(local.clone()), local).with_alert(alert.clone());
        store.set_viewer(Some(Identity::new("u-1").with_role("user")));
        (store, alert)
    }

    fn assert_count_matches(store: &NotificationStore) {
        let snapshot = store.snapshot();
        assert_eq!(snapshot.unread_count, count_unread(&snapshot.notifications));
    }

    #[tokio::test]
    async fn test_fetch_without_viewer_is_noop() {
        let (store, _) = local_store(&[notification("a", false)]);
        store.set_viewer(None);

        store.fetch().await;

        assert!(store.notifications().is_empty());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_unread_count_tracks_every_operation() {
        let (store, _) = local_store(&[
            notification("a", false),
            notification("b", false),
            notification("c", true),
            notification("d", false),
        ]);

        store.fetch().await;
        assert_eq!(store.unread_count(), 3);
        assert_count_matches(&store);

        store.mark_as_read("a").await;
        assert_eq!(store.unread_count(), 2);
        assert_count_matches(&store);

        store.delete_notification("b").await;
        assert_eq!(store.unread_count(), 1);
        assert_count_matches(&store);

        store.mark_all_as_read().await;
        assert_eq!(store.unread_count(), 0);
        assert_count_matches(&store);

        store.clear_all().await;
        assert!(store.notifications().is_empty());
        assert_count_matches(&store);
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent() {
        let (store, _) = local_store(&[notification("a", false), notification("b", false)]);
        store.fetch().await;

        store.mark_as_read("a").await;
        let once = store.snapshot();
        store.mark_as_read("a").await;
        store.mark_as_read("unknown").await;

        assert_eq!(store.snapshot(), once);
        assert_eq!(store.unread_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_read_entry_keeps_count() {
        let (store, _) = local_store(&[notification("read", true), notification("new", false)]);
        store.fetch().await;

        store.delete_notification("read").await;
        assert_eq!(store.unread_count(), 1);

        store.delete_notification("new").await;
        assert_eq!(store.unread_count(), 0);
    }

    #[tokio::test]
    async fn test_local_mutations_persist() {
        let (store, _) = local_store(&[notification("a", false), notification("b", false)]);
        store.fetch().await;

        store.mark_as_read("a").await;
        store.delete_notification("b").await;

        // A fresh fetch sees the fallback writes.
        store.fetch().await;
        let snapshot = store.snapshot();
        assert_eq!(snapshot.notifications.len(), 1);
        assert!(snapshot.notifications[0].is_read);
    }

    #[tokio::test]
    async fn test_corrupt_local_store_resets_to_empty() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        kv.set(NOTIFICATIONS_KEY, "{broken").unwrap();
        let local = LocalNotificationRepository::new(kv);
        let store = NotificationStore::new(Arc::new(local.clone()), local);
        store.set_viewer(Some(Identity::new("u-1")));

        store.fetch().await;

        let snapshot = store.snapshot();
        assert!(snapshot.notifications.is_empty());
        assert_eq!(snapshot.unread_count, 0);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_alert_fires_on_positive_changes() {
        let (store, alert) = local_store(&[notification("a", false), notification("b", false)]);

        store.fetch().await;
        store.fetch().await;
        store.set_sound_enabled(false);
        store.mark_as_read("a").await;
        store.mark_as_read("b").await;

        let calls = alert.calls.lock().unwrap().clone();
        assert_eq!(calls, vec![(2, true), (1, false)]);
    }

    #[tokio::test]
    async fn test_add_local_notification_refreshes() {
        let (store, alert) = local_store(&[]);
        store.fetch().await;

        let mut n = notification("test_1", false);
        n.from_admin = Some(true);
        n.target_role = Some("admin".to_string());
        store.add_local_notification(n).await.unwrap();

        assert_eq!(store.notifications()[0].id, "test_1");
        assert_eq!(alert.calls.lock().unwrap().as_slice(), &[(1, true)]);
    }

    #[tokio::test]
    async fn test_viewer_change_clears_list() {
        let (store, _) = local_store(&[notification("a", false)]);
        store.fetch().await;
        assert_eq!(store.notifications().len(), 1);

        store.set_viewer(Some(Identity::new("u-2")));
        assert!(store.notifications().is_empty());
        assert_eq!(store.unread_count(), 0);
    }
}
