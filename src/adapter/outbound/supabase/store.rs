//! Hosted inventory store.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::client::SupabaseClient;
use super::dto::{MovementInsert, MovementRow, TireInsert, TireRow, TireUpdate};
use super::settings::SupabaseConfig;
use crate::domain::{Movement, NewMovement, NewTire, Tire, TireId, TirePatch, User};
use crate::error::{Error, Result};
use crate::port::outbound::store::{BackendKind, InventoryStore};

const TIRES: &str = "tires";
const MOVEMENTS: &str = "movements";

/// [`InventoryStore`] over the `tires` and `movements` tables.
///
/// Rows are owned by the signed-in user; row-level security on the server
/// scopes every listing to that user.
pub struct SupabaseStore {
    client: SupabaseClient,
    user_id: RwLock<Option<String>>,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client,
            user_id: RwLock::new(None),
        }
    }

    pub fn from_config(config: &SupabaseConfig) -> Result<Self> {
        Ok(Self::new(SupabaseClient::from_config(config)?))
    }

    /// Attach the session user: its id is stamped on inserts and its token
    /// authorizes requests.
    pub fn set_user(&self, user: Option<&User>) {
        *self.user_id.write() = user.map(|u| u.id.clone());
        self.client
            .set_access_token(user.and_then(|u| u.access_token.clone()));
    }

    fn owner(&self) -> String {
        self.user_id.read().clone().unwrap_or_default()
    }

    fn by_id(&self, id: &TireId) -> Result<url::Url> {
        self.client.table_url(TIRES, &format!("id=eq.{id}"))
    }
}

#[async_trait]
impl InventoryStore for SupabaseStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn probe(&self) -> Result<()> {
        let url = self.client.table_url(TIRES, "select=id&limit=1")?;
        let _: Vec<serde_json::Value> = self.client.get(url).await.map_err(|err| {
            Error::BackendUnavailable(match err {
                Error::BackendUnavailable(reason) => reason,
                other => other.to_string(),
            })
        })?;
        info!(url = %self.client.rest_url(), "Hosted backend reachable");
        Ok(())
    }

    async fn list_tires(&self) -> Result<Vec<Tire>> {
        let url = self.client.table_url(TIRES, "select=*&order=created_at.desc")?;
        let rows: Vec<TireRow> = self.client.get(url).await?;
        debug!(count = rows.len(), "Fetched tires");
        rows.into_iter().map(Tire::try_from).collect()
    }

    async fn list_movements(&self) -> Result<Vec<Movement>> {
        let url = self
            .client
            .table_url(MOVEMENTS, "select=*&order=created_at.desc")?;
        let rows: Vec<MovementRow> = self.client.get(url).await?;
        debug!(count = rows.len(), "Fetched movements");
        rows.into_iter().map(Movement::try_from).collect()
    }

    async fn create_tire(&self, tire: &NewTire) -> Result<Tire> {
        let owner = self.owner();
        let url = self.client.table_url(TIRES, "")?;
        let rows: Vec<TireRow> = self
            .client
            .post(url, &[TireInsert::new(tire, &owner)])
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("insert returned no tire row".into()))?;
        Tire::try_from(row)
    }

    async fn update_tire(&self, id: &TireId, patch: &TirePatch) -> Result<Tire> {
        let rows: Vec<TireRow> = self
            .client
            .patch(self.by_id(id)?, &TireUpdate::from(patch))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::tire_not_found(id))?;
        Tire::try_from(row)
    }

    async fn delete_tire(&self, id: &TireId) -> Result<()> {
        let rows: Vec<serde_json::Value> = self.client.delete(self.by_id(id)?).await?;
        if rows.is_empty() {
            return Err(Error::tire_not_found(id));
        }
        Ok(())
    }

    async fn create_movement(&self, movement: &NewMovement) -> Result<Movement> {
        let owner = self.owner();
        let url = self.client.table_url(MOVEMENTS, "")?;
        let rows: Vec<MovementRow> = self
            .client
            .post(url, &[MovementInsert::new(movement, &owner)])
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("insert returned no movement row".into()))?;
        Movement::try_from(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_store() -> SupabaseStore {
        SupabaseStore::from_config(&SupabaseConfig {
            url: "http://127.0.0.1:1".into(),
            anon_key: "anon".into(),
            timeout_ms: 500,
            connect_timeout_ms: 200,
            retry_max_attempts: 1,
            retry_backoff_ms: 0,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn probe_of_unreachable_host_is_backend_unavailable() {
        let store = unreachable_store();
        let err = store.probe().await.unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn listing_from_unreachable_host_counts_as_unavailable() {
        let store = unreachable_store();
        assert!(store.list_tires().await.unwrap_err().is_unavailable());
    }

    #[test]
    fn session_user_sets_owner() {
        let store = unreachable_store();
        assert_eq!(store.owner(), "");
        store.set_user(Some(&User::new("u-9").with_access_token("tok")));
        assert_eq!(store.owner(), "u-9");
        assert_eq!(store.backend(), BackendKind::Remote);
    }
}
