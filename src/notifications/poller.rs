//! Periodic notification refresh tied to the session identity.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::NotificationStore;
use crate::models::Identity;

/// Background task that fetches immediately and then every `period` while an identity is
/// present. An identity change restarts the cycle; losing the identity stops it until a
/// new one arrives.
pub struct NotificationPoller {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn spawn(
        store: NotificationStore,
        identity: watch::Receiver<Option<Identity>>,
        period: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(store, identity, period, cancel.clone()));
        Self { cancel, handle }
    }

    /// Stop polling and wait for the task to exit. In-flight fetches are dropped.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::warn!("Notification poller ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

async fn run(
    store: NotificationStore,
    mut identity: watch::Receiver<Option<Identity>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut current = identity.borrow_and_update().clone();

    loop {
        store.set_viewer(current.clone());

        let next = match &current {
            Some(viewer) => {
                poll_while_signed_in(&store, viewer, &mut identity, period, &cancel).await
            }
            None => wait_for_change(&mut identity, &cancel).await,
        };

        match next {
            Some(next) => current = next,
            None => break,
        }
    }

    tracing::debug!("Notification poller stopped");
}

/// Poll until the identity changes. `None` means the poller should exit.
async fn poll_while_signed_in(
    store: &NotificationStore,
    viewer: &Identity,
    identity: &mut watch::Receiver<Option<Identity>>,
    period: Duration,
    cancel: &CancellationToken,
) -> Option<Option<Identity>> {
    tracing::info!("Polling notifications for {} every {:?}", viewer.id, period);

    // First tick completes immediately.
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return None,
            changed = identity.changed() => {
                changed.ok()?;
                let next = identity.borrow_and_update().clone();
                if next.as_ref() != Some(viewer) {
                    return Some(next);
                }
            }
            _ = ticker.tick() => {
                tokio::select! {
                    _ = cancel.cancelled() => return None,
                    _ = store.fetch() => {}
                }
            }
        }
    }
}

async fn wait_for_change(
    identity: &mut watch::Receiver<Option<Identity>>,
    cancel: &CancellationToken,
) -> Option<Option<Identity>> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        changed = identity.changed() => {
            changed.ok()?;
            Some(identity.borrow_and_update().clone())
        }
    }
}
