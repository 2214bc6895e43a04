//! Session gate: nothing loads until a user is signed in.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::domain::{AuthEvent, User};
use crate::error::{Error, Result};
use crate::port::outbound::session::SessionProvider;

/// Gates inventory initialization on an authenticated session.
pub struct SessionGate {
    provider: Arc<dyn SessionProvider>,
}

impl SessionGate {
    #[must_use]
    pub fn new(provider: Arc<dyn SessionProvider>) -> Self {
        Self { provider }
    }

    /// The signed-in user, or `Unauthenticated`.
    pub async fn authorize(&self) -> Result<User> {
        match self.provider.current_user().await? {
            Some(user) => {
                debug!(user_id = %user.id, "Session authorized");
                Ok(user)
            }
            None => Err(Error::Unauthenticated),
        }
    }

    /// Resolve with the current user, or wait for the next sign-in.
    pub async fn wait_for_sign_in(&self) -> Result<User> {
        if let Some(user) = self.provider.current_user().await? {
            return Ok(user);
        }

        let (tx, rx) = oneshot::channel();
        let slot = Mutex::new(Some(tx));
        self.provider.on_auth_change(Box::new(move |event| {
            if let AuthEvent::SignedIn(user) = event {
                if let Some(tx) = slot.lock().take() {
                    let _ = tx.send(user);
                }
            }
        }));

        info!("Waiting for sign-in");
        rx.await.map_err(|_| Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::session::ConfiguredSession;

    #[tokio::test]
    async fn signed_out_session_is_rejected() {
        let gate = SessionGate::new(Arc::new(ConfiguredSession::default()));
        assert!(matches!(gate.authorize().await, Err(Error::Unauthenticated)));
    }

    #[tokio::test]
    async fn waiting_resolves_on_sign_in() {
        let session = Arc::new(ConfiguredSession::default());
        let gate = SessionGate::new(session.clone());

        let waiter = tokio::spawn(async move { gate.wait_for_sign_in().await });
        while !waiter.is_finished() {
            session.sign_in(User::new("u-7"));
            tokio::task::yield_now().await;
        }
        assert_eq!(waiter.await.unwrap().unwrap().id, "u-7");
    }
}
