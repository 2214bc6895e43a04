//! Session port: the identity collaborator.
//!
//! The inventory core only needs to know who is signed in and to hear about
//! sign-in/sign-out. Credential handling lives entirely behind this trait.

use async_trait::async_trait;

use crate::domain::{AuthEvent, User};
use crate::error::Result;

/// Callback invoked on every authentication state change.
pub type AuthCallback = Box<dyn Fn(AuthEvent) + Send + Sync>;

#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The user of the current session, if any.
    async fn current_user(&self) -> Result<Option<User>>;

    /// Register a listener for authentication changes.
    fn on_auth_change(&self, callback: AuthCallback);
}
