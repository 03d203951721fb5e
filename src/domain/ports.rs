use async_trait::async_trait;
use std::sync::Arc;

// Named slots of the local state mirror.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Token,
    Site,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Token, Slot::Site];

    // Option names used by the host installation.
    pub fn name(self) -> &'static str {
        match self {
            Slot::Token => "jv_comments_admin_token",
            Slot::Site => "jv_comments_site",
        }
    }
}

// Port for the key-value space backing the mirror. Writes are last-write-wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    async fn get(&self, slot: Slot) -> Result<Option<String>, String>;
    async fn set(&self, slot: Slot, value: String) -> Result<(), String>;
    async fn clear(&self, slot: Slot) -> Result<(), String>;
}

#[async_trait]
impl<T> StateStore for Arc<T>
where
    T: StateStore + ?Sized,
{
    async fn get(&self, slot: Slot) -> Result<Option<String>, String> {
        (**self).get(slot).await
    }

    async fn set(&self, slot: Slot, value: String) -> Result<(), String> {
        (**self).set(slot, value).await
    }

    async fn clear(&self, slot: Slot) -> Result<(), String> {
        (**self).clear(slot).await
    }
}
