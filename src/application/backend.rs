//! Backend selection and session failover.
//!
//! The remote store is probed once at startup. When it is unreachable, or
//! when a later listing or tire insert reports it unavailable, the session
//! moves to local storage and stays there. Only a completed migration moves
//! it back.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::domain::{Movement, NewMovement, NewTire, Tire, TireId, TirePatch};
use crate::error::{Error, Result};
use crate::port::outbound::notifier::{Notice, Notifier};
use crate::port::outbound::store::{BackendKind, ClearableStore, InventoryStore};

const FALLBACK_NOTICE: &str = "Hosted backend unavailable, working on local storage";

/// The session's store: remote while reachable, local after failover.
pub struct FailoverStore {
    remote: Option<Arc<dyn InventoryStore>>,
    local: Arc<dyn ClearableStore>,
    active: RwLock<BackendKind>,
    notifier: Arc<dyn Notifier>,
}

impl FailoverStore {
    /// The store currently serving requests.
    #[must_use]
    pub fn active(&self) -> BackendKind {
        *self.active.read()
    }

    #[must_use]
    pub fn remote(&self) -> Option<&Arc<dyn InventoryStore>> {
        self.remote.as_ref()
    }

    #[must_use]
    pub fn local(&self) -> &Arc<dyn ClearableStore> {
        &self.local
    }

    /// Point the session at the remote store.
    pub fn switch_to_remote(&self) -> Result<()> {
        if self.remote.is_none() {
            return Err(Error::BackendUnavailable("no remote backend configured".into()));
        }
        *self.active.write() = BackendKind::Remote;
        info!(backend = %BackendKind::Remote, "Session switched backend");
        Ok(())
    }

    fn fail_over(&self, reason: &Error) {
        let mut active = self.active.write();
        if *active == BackendKind::Local {
            return;
        }
        *active = BackendKind::Local;
        drop(active);
        warn!(error = %reason, "Remote unavailable, falling back to local storage");
        self.notifier.notify(Notice::warning(FALLBACK_NOTICE));
    }

    fn current(&self) -> Option<&Arc<dyn InventoryStore>> {
        match self.active() {
            BackendKind::Remote => self.remote.as_ref(),
            BackendKind::Local => None,
        }
    }
}

#[async_trait]
impl InventoryStore for FailoverStore {
    fn backend(&self) -> BackendKind {
        self.active()
    }

    async fn probe(&self) -> Result<()> {
        match self.current() {
            Some(remote) => remote.probe().await,
            None => self.local.probe().await,
        }
    }

    async fn list_tires(&self) -> Result<Vec<Tire>> {
        if let Some(remote) = self.current() {
            match remote.list_tires().await {
                Err(err) if err.is_unavailable() => self.fail_over(&err),
                result => return result,
            }
        }
        self.local.list_tires().await
    }

    async fn list_movements(&self) -> Result<Vec<Movement>> {
        if let Some(remote) = self.current() {
            match remote.list_movements().await {
                Err(err) if err.is_unavailable() => self.fail_over(&err),
                result => return result,
            }
        }
        self.local.list_movements().await
    }

    async fn create_tire(&self, tire: &NewTire) -> Result<Tire> {
        if let Some(remote) = self.current() {
            match remote.create_tire(tire).await {
                Err(err) if err.is_unavailable() => self.fail_over(&err),
                result => return result,
            }
        }
        self.local.create_tire(tire).await
    }

    async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<Tire> {
        match self.current() {
            Some(remote) => remote.update_tire(id, patch).await,
            None => self.local.update_tire(id, patch).await,
        }
    }

    async fn delete_tire(&self, id: &TireId) -> Result<()> {
        match self.current() {
            Some(remote) => remote.delete_tire(id).await,
            None => self.local.delete_tire(id).await,
        }
    }

    async fn create_movement(&self, movement: &NewMovement) -> Result<Movement> {
        match self.current() {
            Some(remote) => remote.create_movement(movement).await,
            None => self.local.create_movement(movement).await,
        }
    }
}

/// Startup probe that fixes the session's initial backend.
pub struct BackendSelector {
    remote: Option<Arc<dyn InventoryStore>>,
    local: Arc<dyn ClearableStore>,
    notifier: Arc<dyn Notifier>,
}

impl BackendSelector {
    pub fn new(
        remote: Option<Arc<dyn InventoryStore>>,
        local: Arc<dyn ClearableStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            remote,
            local,
            notifier,
        }
    }

    /// Probe the remote store once and build the session store.
    pub async fn select(self) -> FailoverStore {
        let active = match &self.remote {
            None => {
                info!("No remote backend configured, using local storage");
                BackendKind::Local
            }
            Some(remote) => match remote.probe().await {
                Ok(()) => BackendKind::Remote,
                Err(err) => {
                    warn!(error = %err, "Remote probe failed, using local storage");
                    self.notifier.notify(Notice::warning(FALLBACK_NOTICE));
                    BackendKind::Local
                }
            },
        };
        info!(backend = %active, "Backend selected");

        FailoverStore {
            remote: self.remote,
            local: self.local,
            active: RwLock::new(active),
            notifier: self.notifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::new_tire;
    use crate::testkit::notifier::RecordingNotifier;
    use crate::testkit::store::MemoryStore;
    use rust_decimal_macros::dec;

    struct Setup {
        remote: Arc<MemoryStore>,
        local: Arc<MemoryStore>,
        notices: RecordingNotifier,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                remote: Arc::new(MemoryStore::remote()),
                local: Arc::new(MemoryStore::new()),
                notices: RecordingNotifier::new(),
            }
        }

        async fn select(&self) -> FailoverStore {
            BackendSelector::new(
                Some(self.remote.clone()),
                self.local.clone(),
                Arc::new(self.notices.clone()),
            )
            .select()
            .await
        }
    }

    #[tokio::test]
    async fn reachable_remote_is_selected() {
        let setup = Setup::new();
        let store = setup.select().await;
        assert_eq!(store.backend(), BackendKind::Remote);
        assert!(setup.notices.is_empty());
    }

    #[tokio::test]
    async fn failed_probe_selects_local_for_the_session() {
        let setup = Setup::new();
        setup.remote.set_unavailable(true);
        let store = setup.select().await;
        assert_eq!(store.backend(), BackendKind::Local);

        setup.remote.set_unavailable(false);
        store.create_tire(&new_tire("Pirelli", dec!(80), 1)).await.unwrap();
        assert_eq!(setup.local.tires().len(), 1);
        assert!(setup.remote.tires().is_empty());
        assert_eq!(setup.notices.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_create_falls_over_and_stays_local() {
        let setup = Setup::new();
        let store = setup.select().await;
        setup.remote.set_unavailable(true);

        let tire = store.create_tire(&new_tire("Dunlop", dec!(60), 2)).await.unwrap();
        assert_eq!(store.backend(), BackendKind::Local);
        assert!(setup.local.tire(&tire.id).is_some());

        setup.remote.set_unavailable(false);
        store.create_tire(&new_tire("Dunlop", dec!(60), 2)).await.unwrap();
        assert_eq!(setup.local.tires().len(), 2);
    }

    #[tokio::test]
    async fn other_remote_errors_are_surfaced() {
        let setup = Setup::new();
        let store = setup.select().await;
        let err = store
            .update_tire(&TireId::from("missing"), &TirePatch::stock(1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert_eq!(store.backend(), BackendKind::Remote);
    }

    #[tokio::test]
    async fn without_remote_everything_is_local() {
        let local = Arc::new(MemoryStore::new());
        let store = BackendSelector::new(None, local, Arc::new(RecordingNotifier::new()))
            .select()
            .await;
        assert_eq!(store.backend(), BackendKind::Local);
        assert!(store.switch_to_remote().is_err());
    }
}
