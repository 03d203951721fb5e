use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_json::{Map, Value};
use std::ops::Deref;

use crate::domain::entities::{SiteSummary, Token, lenient_opt_bool};
use crate::domain::errors::RemoteError;

// The serialization within this layer is a dependency leak, but it keeps one schema
// per remote operation in a single place.

// Site record as the remote API returns it from creation, settings update and settings fetch.
// Every field is optional on the wire; callers decide which ones they need.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A remote JSON body kept exactly as received, next to its typed view.
///
/// The typed view drives local decisions (mirror projection, error checks). Serializing
/// writes the original bytes back out, so passthrough responses are never rewritten.
#[derive(Clone, Debug)]
pub struct Verbatim<T> {
    value: T,
    raw: Box<RawValue>,
}

impl<T> Verbatim<T> {
    pub fn raw(&self) -> &str {
        self.raw.get()
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> Deref for Verbatim<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T> PartialEq for Verbatim<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl<'de, T> Deserialize<'de> for Verbatim<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        let value = serde_json::from_str(raw.get()).map_err(serde::de::Error::custom)?;
        Ok(Self { value, raw })
    }
}

impl<T> Serialize for Verbatim<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.raw.serialize(serializer)
    }
}

// Success body of the site mutation endpoints. A 200 response may still carry `errors`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SiteResponse {
    #[serde(default)]
    pub data: Option<RemoteSite>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl SiteResponse {
    pub fn website_id(&self) -> Option<&str> {
        self.data.as_ref()?.website_id.as_deref()
    }
}

pub type SiteEnvelope = Verbatim<SiteResponse>;

// Inner `data` of the settings fetch.
pub type SiteSettings = Verbatim<RemoteSite>;

// Listing entry. The listing endpoint spells the id `websiteID`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct WebsiteRecord {
    #[serde(rename = "websiteID", alias = "websiteId")]
    pub website_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl From<WebsiteRecord> for SiteSummary {
    fn from(record: WebsiteRecord) -> Self {
        SiteSummary {
            website_id: record.website_id,
            name: record.name,
            url: record.url,
        }
    }
}

// Payload sent to the site creation endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AddSiteRequest {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Registration form fields, forwarded as-is apart from the injected client id.
pub type RegistrationFields = Map<String, Value>;

// Decoded registration payload. The endpoint can answer 200 with field errors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RegisterOutcome {
    Rejected { errors: Value },
    Issued(Token),
}

// The use cases depend on this trait, not on the reqwest client.
#[async_trait]
pub trait CommentsApi: Send + Sync {
    async fn register(&self, fields: RegistrationFields) -> Result<RegisterOutcome, RemoteError>;

    async fn login(&self, username: &str, password: &str) -> Result<Token, RemoteError>;

    async fn get_sites(&self, token: &Token) -> Result<Vec<WebsiteRecord>, RemoteError>;

    async fn add_site(
        &self,
        token: &Token,
        req: &AddSiteRequest,
    ) -> Result<SiteEnvelope, RemoteError>;

    async fn update_site_settings(
        &self,
        token: &Token,
        params: &Value,
    ) -> Result<SiteEnvelope, RemoteError>;

    async fn get_site_settings(
        &self,
        id: &str,
        token: &Token,
    ) -> Result<SiteSettings, RemoteError>;
}

#[async_trait]
impl<T> CommentsApi for std::sync::Arc<T>
where
    T: CommentsApi + ?Sized,
{
    async fn register(&self, fields: RegistrationFields) -> Result<RegisterOutcome, RemoteError> {
        (**self).register(fields).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Token, RemoteError> {
        (**self).login(username, password).await
    }

    async fn get_sites(&self, token: &Token) -> Result<Vec<WebsiteRecord>, RemoteError> {
        (**self).get_sites(token).await
    }

    async fn add_site(
        &self,
        token: &Token,
        req: &AddSiteRequest,
    ) -> Result<SiteEnvelope, RemoteError> {
        (**self).add_site(token, req).await
    }

    async fn update_site_settings(
        &self,
        token: &Token,
        params: &Value,
    ) -> Result<SiteEnvelope, RemoteError> {
        (**self).update_site_settings(token, params).await
    }

    async fn get_site_settings(
        &self,
        id: &str,
        token: &Token,
    ) -> Result<SiteSettings, RemoteError> {
        (**self).get_site_settings(id, token).await
    }
}
