//! Composition root: wires configuration into stores, session and the
//! inventory context.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::local::{KeyValueStorage, LocalStore};
use crate::adapter::outbound::session::ConfiguredSession;
use crate::adapter::outbound::supabase::SupabaseStore;
use crate::application::{BackendSelector, FailoverStore, Inventory, SessionGate};
use crate::domain::User;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::notifier::{LogNotifier, Notifier, NotifierRegistry};
use crate::port::outbound::store::InventoryStore;

/// Registry with the log notifier plus the caller's presentation notifier.
pub fn build_notifier_registry(presenter: Box<dyn Notifier>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    registry.register(presenter);
    registry
}

/// Open the local fallback store at its configured directory.
#[allow(clippy::result_large_err)]
pub fn build_local_store(config: &Config) -> Result<Arc<LocalStore>> {
    let dir = config.local.resolve_path()?;
    let storage = KeyValueStorage::open(dir)?;
    info!(path = %storage.dir().display(), "Local storage opened");
    Ok(Arc::new(LocalStore::new(storage)))
}

/// Build the remote store when one is configured.
#[allow(clippy::result_large_err)]
pub fn build_remote_store(config: &Config, user: &User) -> Result<Option<Arc<SupabaseStore>>> {
    if !config.supabase.is_configured() {
        return Ok(None);
    }
    let store = SupabaseStore::from_config(&config.supabase)?;
    store.set_user(Some(user));
    Ok(Some(Arc::new(store)))
}

/// Probe the remote store and fix the session backend.
#[allow(clippy::result_large_err)]
pub async fn select_backend(
    config: &Config,
    user: &User,
    notifier: Arc<dyn Notifier>,
) -> Result<Arc<FailoverStore>> {
    let local = build_local_store(config)?;
    let remote = build_remote_store(config, user)?.map(|r| r as Arc<dyn InventoryStore>);
    let store = BackendSelector::new(remote, local, notifier).select().await;
    Ok(Arc::new(store))
}

/// Interactive sign-in used when no identity is configured.
///
/// Runs on a blocking thread; `None` abandons the sign-in.
pub type SignInPrompt = Box<dyn FnOnce() -> Option<User> + Send + 'static>;

/// Authorize the session and open the inventory.
///
/// Without a configured identity the session waits for `sign_in` to supply
/// one. With no prompt the session stays signed out and opening fails with
/// `Unauthenticated`.
pub async fn open_inventory(
    config: &Config,
    notifier: Arc<dyn Notifier>,
    sign_in: Option<SignInPrompt>,
) -> Result<Inventory> {
    let session = Arc::new(ConfiguredSession::from_config(&config.session));
    let gate = SessionGate::new(session.clone());
    let user = match sign_in {
        Some(prompt) => await_sign_in(&gate, &session, prompt).await?,
        None => gate.authorize().await?,
    };
    if config.session.is_demo() {
        info!("Running with the demo identity");
    }
    let store = select_backend(config, &user, notifier.clone()).await?;
    Inventory::open(&gate, store, notifier, config.ledger.strict).await
}

async fn await_sign_in(
    gate: &SessionGate,
    session: &ConfiguredSession,
    prompt: SignInPrompt,
) -> Result<User> {
    let prompted = async {
        match tokio::task::spawn_blocking(prompt).await {
            Ok(Some(user)) => {
                session.sign_in(user);
                std::future::pending::<Result<User>>().await
            }
            Ok(None) => Err(Error::Unauthenticated),
            Err(err) => {
                warn!(error = %err, "Sign-in prompt failed");
                Err(Error::Unauthenticated)
            }
        }
    };

    // The gate registers its listener before the prompt starts.
    tokio::select! {
        biased;
        user = gate.wait_for_sign_in() => user,
        failed = prompted => failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::store::BackendKind;
    use crate::testkit::notifier::RecordingNotifier;

    fn config(dir: &std::path::Path, with_user: bool) -> Config {
        let mut toml = format!("[local]\npath = {:?}\n", dir.display().to_string());
        if with_user {
            toml.push_str("[session]\nuser_id = \"demo-user\"\n");
        }
        toml::from_str(&toml).unwrap()
    }

    #[tokio::test]
    async fn unconfigured_remote_opens_on_local() {
        let dir = tempfile::tempdir().unwrap();
        let inventory =
            open_inventory(&config(dir.path(), true), Arc::new(RecordingNotifier::new()), None)
                .await
                .unwrap();
        assert_eq!(inventory.backend(), BackendKind::Local);
        assert_eq!(inventory.user().id, "demo-user");
    }

    #[tokio::test]
    async fn missing_session_user_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let result =
            open_inventory(&config(dir.path(), false), Arc::new(RecordingNotifier::new()), None).await;
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }

    #[tokio::test]
    async fn interactive_sign_in_opens_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let prompt: SignInPrompt = Box::new(|| Some(User::new("counter-2")));
        let inventory = open_inventory(
            &config(dir.path(), false),
            Arc::new(RecordingNotifier::new()),
            Some(prompt),
        )
        .await
        .unwrap();
        assert_eq!(inventory.user().id, "counter-2");
    }

    #[tokio::test]
    async fn configured_identity_skips_the_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let prompt: SignInPrompt = Box::new(|| panic!("prompt must not run"));
        let inventory = open_inventory(
            &config(dir.path(), true),
            Arc::new(RecordingNotifier::new()),
            Some(prompt),
        )
        .await
        .unwrap();
        assert_eq!(inventory.user().id, "demo-user");
    }

    #[tokio::test]
    async fn abandoned_sign_in_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let prompt: SignInPrompt = Box::new(|| None);
        let result = open_inventory(
            &config(dir.path(), false),
            Arc::new(RecordingNotifier::new()),
            Some(prompt),
        )
        .await;
        assert!(matches!(result, Err(Error::Unauthenticated)));
    }

    #[test]
    fn registry_holds_log_and_presenter() {
        let registry = build_notifier_registry(Box::new(RecordingNotifier::new()));
        assert_eq!(registry.len(), 2);
    }
}
