use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::domain::entities::{CachedSite, Token};
use crate::domain::errors::RemoteError;
use crate::domain::ports::{Slot, StateStore};
use crate::domain::remote::{
    AddSiteRequest, CommentsApi, RegisterOutcome, RegistrationFields, SiteEnvelope, SiteSettings,
    WebsiteRecord,
};

pub(crate) fn token(access_token: &str) -> Token {
    serde_json::from_value(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3600
    }))
    .expect("expected token fixture to decode")
}

pub(crate) fn cached_site(website_id: &str) -> CachedSite {
    CachedSite {
        website_id: website_id.to_string(),
        is_open: true,
        widget_position: Some("left".to_string()),
        language_id: None,
        theme: None,
    }
}

// Envelopes keep the raw text, so fixtures go through a JSON string.
pub(crate) fn envelope(body: Value) -> SiteEnvelope {
    serde_json::from_str(&body.to_string()).expect("expected envelope fixture to decode")
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub get: bool,
    pub set: bool,
    // Clearing this slot fails; other slots clear normally.
    pub clear: Option<Slot>,
}

// Shared slot table so tests can inspect exactly what a use case wrote.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    slots: Arc<Mutex<HashMap<Slot, String>>>,
    writes: Arc<Mutex<usize>>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            writes: Arc::new(Mutex::new(0)),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_raw(&self, slot: Slot, value: impl Into<String>) {
        let mut guard = self.slots.lock().expect("slots mutex poisoned");
        guard.insert(slot, value.into());
    }

    pub(crate) fn insert_json(&self, slot: Slot, value: &impl serde::Serialize) {
        self.insert_raw(slot, serde_json::to_string(value).expect("fixture encodes"));
    }

    pub(crate) fn raw(&self, slot: Slot) -> Option<String> {
        let guard = self.slots.lock().expect("slots mutex poisoned");
        guard.get(&slot).cloned()
    }

    pub(crate) fn json(&self, slot: Slot) -> Option<Value> {
        self.raw(slot)
            .map(|raw| serde_json::from_str(&raw).expect("stored slot is json"))
    }

    pub(crate) fn write_count(&self) -> usize {
        *self.writes.lock().expect("writes mutex poisoned")
    }
}

#[async_trait]
impl StateStore for RecordingStore {
    async fn get(&self, slot: Slot) -> Result<Option<String>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }
        Ok(self.raw(slot))
    }

    async fn set(&self, slot: Slot, value: String) -> Result<(), String> {
        if self.failures.set {
            return Err("set failed".to_string());
        }
        *self.writes.lock().expect("writes mutex poisoned") += 1;
        self.insert_raw(slot, value);
        Ok(())
    }

    async fn clear(&self, slot: Slot) -> Result<(), String> {
        if self.failures.clear == Some(slot) {
            return Err("clear failed".to_string());
        }
        *self.writes.lock().expect("writes mutex poisoned") += 1;
        let mut guard = self.slots.lock().expect("slots mutex poisoned");
        guard.remove(&slot);
        Ok(())
    }
}

// Scripted remote API. Unscripted operations answer `RemoteError::Unknown`.
#[derive(Clone, Default)]
pub(crate) struct ScriptedApi {
    pub register: Option<Result<RegisterOutcome, RemoteError>>,
    pub login: Option<Result<Token, RemoteError>>,
    pub get_sites: Option<Result<Vec<WebsiteRecord>, RemoteError>>,
    pub add_site: Option<Result<SiteEnvelope, RemoteError>>,
    pub update_site_settings: Option<Result<SiteEnvelope, RemoteError>>,
    pub get_site_settings: Option<Result<SiteSettings, RemoteError>>,
    pub(crate) calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedApi {
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(call.into());
    }
}

fn scripted<T: Clone>(answer: &Option<Result<T, RemoteError>>) -> Result<T, RemoteError> {
    answer.clone().unwrap_or(Err(RemoteError::Unknown))
}

#[async_trait]
impl CommentsApi for ScriptedApi {
    async fn register(&self, fields: RegistrationFields) -> Result<RegisterOutcome, RemoteError> {
        self.record(format!("register:{}", Value::Object(fields)));
        scripted(&self.register)
    }

    async fn login(&self, username: &str, _password: &str) -> Result<Token, RemoteError> {
        self.record(format!("login:{username}"));
        scripted(&self.login)
    }

    async fn get_sites(&self, token: &Token) -> Result<Vec<WebsiteRecord>, RemoteError> {
        self.record(format!("get_sites:{}", token.access_token));
        scripted(&self.get_sites)
    }

    async fn add_site(
        &self,
        token: &Token,
        req: &AddSiteRequest,
    ) -> Result<SiteEnvelope, RemoteError> {
        self.record(format!("add_site:{}:{}", token.access_token, req.name));
        scripted(&self.add_site)
    }

    async fn update_site_settings(
        &self,
        token: &Token,
        _params: &Value,
    ) -> Result<SiteEnvelope, RemoteError> {
        self.record(format!("update_site_settings:{}", token.access_token));
        scripted(&self.update_site_settings)
    }

    async fn get_site_settings(
        &self,
        id: &str,
        token: &Token,
    ) -> Result<SiteSettings, RemoteError> {
        self.record(format!("get_site_settings:{id}:{}", token.access_token));
        scripted(&self.get_site_settings)
    }
}
