use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::ports::{Slot, StateStore};
use crate::domain::remote::CommentsApi;
use crate::interface_adapters::gate::AccessPolicy;
use crate::use_cases::credentials::CredentialBroker;
use crate::use_cases::mirror::StateMirror;
use crate::use_cases::sites::SiteRegistry;
use crate::use_cases::widget::MirrorViews;

pub type SharedApi = Arc<dyn CommentsApi>;
pub type SharedStore = Arc<dyn StateStore>;

#[derive(Clone)]
pub struct AppState {
    // We use Arc<dyn Trait> to hold any implementation (dependency injection).
    pub api: SharedApi,
    pub store: SharedStore,
    pub access: Arc<dyn AccessPolicy>,
}

impl AppState {
    pub fn credentials(&self) -> CredentialBroker<SharedApi, SharedStore> {
        CredentialBroker {
            api: self.api.clone(),
            mirror: StateMirror::new(self.store.clone()),
        }
    }

    pub fn sites(&self) -> SiteRegistry<SharedApi, SharedStore> {
        SiteRegistry {
            api: self.api.clone(),
            mirror: StateMirror::new(self.store.clone()),
        }
    }

    pub fn views(&self) -> MirrorViews<SharedStore> {
        MirrorViews {
            mirror: StateMirror::new(self.store.clone()),
        }
    }
}

// In-memory mirror used when no database is configured.
#[derive(Clone, Default)]
pub struct InMemoryStateStore {
    pub slots: Arc<Mutex<HashMap<Slot, String>>>,
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, slot: Slot) -> Result<Option<String>, String> {
        let slots = self.slots.lock().await;
        Ok(slots.get(&slot).cloned())
    }

    async fn set(&self, slot: Slot, value: String) -> Result<(), String> {
        let mut slots = self.slots.lock().await;
        slots.insert(slot, value);
        Ok(())
    }

    async fn clear(&self, slot: Slot) -> Result<(), String> {
        let mut slots = self.slots.lock().await;
        slots.remove(&slot);
        Ok(())
    }
}

// PostgreSQL-backed mirror; one row per slot in `plugin_options`.
#[derive(Clone)]
pub struct PostgresStateStore {
    pub db: PgPool,
}

#[async_trait]
impl StateStore for PostgresStateStore {
    async fn get(&self, slot: Slot) -> Result<Option<String>, String> {
        sqlx::query_scalar::<_, String>("SELECT value FROM plugin_options WHERE name = $1")
            .bind(slot.name())
            .fetch_optional(&self.db)
            .await
            .map_err(|err| err.to_string())
    }

    async fn set(&self, slot: Slot, value: String) -> Result<(), String> {
        sqlx::query(
            r#"
            INSERT INTO plugin_options (name, value)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = now()
            "#,
        )
        .bind(slot.name())
        .bind(value)
        .execute(&self.db)
        .await
        .map_err(|err| err.to_string())?;

        Ok(())
    }

    async fn clear(&self, slot: Slot) -> Result<(), String> {
        sqlx::query("DELETE FROM plugin_options WHERE name = $1")
            .bind(slot.name())
            .execute(&self.db)
            .await
            .map_err(|err| err.to_string())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn when_slot_is_set_then_get_returns_latest_value() {
        let store = InMemoryStateStore::default();

        store.set(Slot::Site, "first".to_string()).await.expect("set");
        store.set(Slot::Site, "second".to_string()).await.expect("set");

        assert_eq!(
            store.get(Slot::Site).await.expect("get"),
            Some("second".to_string())
        );
        assert_eq!(store.get(Slot::Token).await.expect("get"), None);
    }

    #[tokio::test]
    async fn when_empty_slot_is_cleared_then_clear_succeeds() {
        let store = InMemoryStateStore::default();

        store.clear(Slot::Token).await.expect("clear");

        assert_eq!(store.get(Slot::Token).await.expect("get"), None);
    }
}
