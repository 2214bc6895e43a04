//! Session provider backed by configuration.
//!
//! The identity provider itself is external; this adapter holds whatever
//! identity the process was started with and lets an interactive sign-in
//! supply one at runtime, notifying registered listeners.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use tracing::info;

use crate::domain::{AuthEvent, User};
use crate::error::Result;
use crate::port::outbound::session::{AuthCallback, SessionProvider};

/// Environment variable overriding [`SessionConfig::access_token`].
pub const ACCESS_TOKEN_ENV: &str = "TIRESTOCK_ACCESS_TOKEN";

/// Identifier used by the demo identity.
pub const DEMO_USER_ID: &str = "demo-user";

/// `[session]` configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    pub user_id: Option<String>,
    pub email: Option<String>,
    pub access_token: Option<String>,
}

impl SessionConfig {
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(ACCESS_TOKEN_ENV) {
            self.access_token = Some(token);
        }
    }

    /// The configured user, if an id is present.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        let id = self.user_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        let mut user = User::new(id);
        if let Some(email) = &self.email {
            user = user.with_email(email.clone());
        }
        if let Some(token) = &self.access_token {
            user = user.with_access_token(token.clone());
        }
        Some(user)
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.user_id.as_deref() == Some(DEMO_USER_ID)
    }
}

/// [`SessionProvider`] holding an in-process identity.
#[derive(Default)]
pub struct ConfiguredSession {
    user: RwLock<Option<User>>,
    listeners: Mutex<Vec<AuthCallback>>,
}

impl ConfiguredSession {
    #[must_use]
    pub fn new(user: Option<User>) -> Self {
        Self {
            user: RwLock::new(user),
            listeners: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.user())
    }

    pub fn sign_in(&self, user: User) {
        info!(user_id = %user.id, "Signed in");
        *self.user.write() = Some(user.clone());
        self.emit(&AuthEvent::SignedIn(user));
    }

    fn emit(&self, event: &AuthEvent) {
        for listener in self.listeners.lock().iter() {
            listener(event.clone());
        }
    }
}

#[async_trait]
impl SessionProvider for ConfiguredSession {
    async fn current_user(&self) -> Result<Option<User>> {
        Ok(self.user.read().clone())
    }

    fn on_auth_change(&self, callback: AuthCallback) {
        self.listeners.lock().push(callback);
    }
}
