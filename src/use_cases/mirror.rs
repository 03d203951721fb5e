use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::entities::{CachedSite, Token};
use crate::domain::errors::SyncError;
use crate::domain::ports::{Slot, StateStore};

/// Typed view over the two mirror slots. Both slots hold JSON text.
///
/// A slot that cannot be decoded is reported as a storage failure rather than
/// silently treated as empty.
pub struct StateMirror<S> {
    pub store: S,
}

impl<S> StateMirror<S>
where
    S: StateStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn token(&self) -> Result<Option<Token>, SyncError> {
        self.load(Slot::Token).await
    }

    pub async fn save_token(&self, token: &Token) -> Result<(), SyncError> {
        self.save(Slot::Token, token).await
    }

    pub async fn site(&self) -> Result<Option<CachedSite>, SyncError> {
        self.load(Slot::Site).await
    }

    pub async fn save_site(&self, site: &CachedSite) -> Result<(), SyncError> {
        self.save(Slot::Site, site).await
    }

    // Clears both slots. Clearing an empty slot is not an error, and a failed slot
    // does not stop the other one from being cleared.
    pub async fn clear_all(&self) -> Result<(), SyncError> {
        let mut failed = false;
        for slot in Slot::ALL {
            if let Err(err) = self.store.clear(slot).await {
                tracing::error!(slot = slot.name(), error = %err, "failed to clear slot.");
                failed = true;
            }
        }

        if failed {
            return Err(SyncError::StorageFailure);
        }
        Ok(())
    }

    async fn load<T: DeserializeOwned>(&self, slot: Slot) -> Result<Option<T>, SyncError> {
        let raw = self.store.get(slot).await.map_err(|err| {
            tracing::error!(slot = slot.name(), error = %err, "failed to read slot.");
            SyncError::StorageFailure
        })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        serde_json::from_str(&raw).map(Some).map_err(|err| {
            tracing::error!(slot = slot.name(), error = %err, "stored slot is not valid json.");
            SyncError::StorageFailure
        })
    }

    async fn save<T: Serialize>(&self, slot: Slot, value: &T) -> Result<(), SyncError> {
        let raw = serde_json::to_string(value).map_err(|err| {
            tracing::error!(slot = slot.name(), error = %err, "failed to encode slot.");
            SyncError::StorageFailure
        })?;

        self.store.set(slot, raw).await.map_err(|err| {
            tracing::error!(slot = slot.name(), error = %err, "failed to write slot.");
            SyncError::StorageFailure
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FailureFlags, RecordingStore, cached_site, token};

    #[tokio::test]
    async fn when_slots_are_empty_then_token_and_site_are_none() {
        let mirror = StateMirror::new(RecordingStore::new());

        assert_eq!(mirror.token().await.expect("read token"), None);
        assert_eq!(mirror.site().await.expect("read site"), None);
    }

    #[tokio::test]
    async fn when_token_is_saved_twice_then_last_write_wins() {
        let store = RecordingStore::new();
        let mirror = StateMirror::new(store.clone());

        mirror.save_token(&token("t1")).await.expect("save t1");
        mirror.save_token(&token("t2")).await.expect("save t2");

        assert_eq!(mirror.token().await.expect("read"), Some(token("t2")));
    }

    #[tokio::test]
    async fn when_site_is_saved_then_slot_holds_json_text() {
        let store = RecordingStore::new();
        let mirror = StateMirror::new(store.clone());

        mirror.save_site(&cached_site("w1")).await.expect("save site");

        let raw = store.raw(Slot::Site).expect("site slot written");
        assert_eq!(
            raw,
            r#"{"websiteId":"w1","isOpen":true,"widgetPosition":"left"}"#
        );
    }

    #[tokio::test]
    async fn when_clear_all_runs_then_both_slots_are_empty() {
        let store = RecordingStore::new();
        let mirror = StateMirror::new(store.clone());
        mirror.save_token(&token("t1")).await.expect("save token");
        mirror.save_site(&cached_site("w1")).await.expect("save site");

        mirror.clear_all().await.expect("clear");

        assert_eq!(store.raw(Slot::Token), None);
        assert_eq!(store.raw(Slot::Site), None);
    }

    #[tokio::test]
    async fn when_token_slot_fails_to_clear_then_site_slot_is_still_cleared() {
        let store = RecordingStore::new().with_failures(FailureFlags {
            clear: Some(Slot::Token),
            ..Default::default()
        });
        store.insert_json(Slot::Token, &token("t1"));
        store.insert_json(Slot::Site, &cached_site("w1"));
        let mirror = StateMirror::new(store.clone());

        let result = mirror.clear_all().await;

        assert!(matches!(result, Err(SyncError::StorageFailure)));
        assert_eq!(store.raw(Slot::Site), None);
        assert!(store.raw(Slot::Token).is_some());
    }

    #[tokio::test]
    async fn when_slot_holds_garbage_then_returns_storage_failure() {
        let store = RecordingStore::new();
        store.insert_raw(Slot::Token, "a:1:{not json");
        let mirror = StateMirror::new(store);

        let result = mirror.token().await;

        assert!(matches!(result, Err(SyncError::StorageFailure)));
    }

    #[tokio::test]
    async fn when_store_write_fails_then_returns_storage_failure() {
        let store = RecordingStore::new().with_failures(FailureFlags {
            set: true,
            ..Default::default()
        });
        let mirror = StateMirror::new(store);

        let result = mirror.save_site(&cached_site("w1")).await;

        assert!(matches!(result, Err(SyncError::StorageFailure)));
    }
}
