use crate::domain::{
    AddSiteRequest, CommentsApi, RegisterOutcome, RegistrationFields, RemoteError, SiteEnvelope,
    SiteSettings, Token, WebsiteRecord,
};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use url::Url;

// Hosted endpoints of the comments service.
pub const AUTH_ENDPOINT: &str = "https://id.jointcomments.com";
pub const API_ENDPOINT: &str = "https://wp.jointcomments.com";

const JSON: &str = "application/json";
const JSON_PATCH: &str = "application/json-patch+json";
const FORM: &str = "application/x-www-form-urlencoded";

#[derive(Clone, Debug)]
pub struct Endpoints {
    pub auth: Url,
    pub api: Url,
}

impl Endpoints {
    pub fn new(auth: &str, api: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            auth: Url::parse(auth)?,
            api: Url::parse(api)?,
        })
    }

    pub fn hosted() -> Result<Self, url::ParseError> {
        Self::new(AUTH_ENDPOINT, API_ENDPOINT)
    }
}

// OAuth client registered with the auth issuer. The secret comes from configuration.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

// Status and body of a completed HTTP exchange.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct WebsiteList {
    #[serde(default)]
    data: Option<Vec<WebsiteRecord>>,
}

#[derive(Debug, Deserialize)]
struct SettingsEnvelope {
    data: SiteSettings,
}

// Thin wrapper around reqwest for the comments service.
#[derive(Clone)]
pub struct CommentsClient {
    http: Client,
    endpoints: Endpoints,
    credentials: ClientCredentials,
}

impl CommentsClient {
    pub fn new(
        endpoints: Endpoints,
        credentials: ClientCredentials,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoints,
            credentials,
        })
    }

    // Transport failures come back as `Err`; any HTTP status counts as a completed exchange.
    async fn send(&self, request: RequestBuilder) -> Result<RawResponse, reqwest::Error> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse { status, body })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let raw = self.send(request).await.map_err(|err| {
            tracing::warn!(operation, error = %err, "comments service unreachable.");
            err
        });
        let result = normalize(raw);
        if let Err(RemoteError::Malformed(detail)) = &result {
            tracing::warn!(operation, %detail, "comments service response did not match schema.");
        }
        result
    }

    fn bearer(&self, request: RequestBuilder, token: &Token) -> RequestBuilder {
        request
            .bearer_auth(&token.access_token)
            .header(ACCEPT, JSON)
    }
}

// Maps a completed or failed exchange onto the success schema or the error taxonomy.
pub fn normalize<T: DeserializeOwned>(
    raw: Result<RawResponse, reqwest::Error>,
) -> Result<T, RemoteError> {
    let Ok(raw) = raw else {
        return Err(RemoteError::Unknown);
    };

    if raw.status != StatusCode::OK {
        return Err(classify_failure(&raw.body));
    }

    serde_json::from_slice(&raw.body).map_err(|err| RemoteError::Malformed(err.to_string()))
}

// Priority: field validation, then OAuth-style, then unknown.
pub fn classify_failure(body: &[u8]) -> RemoteError {
    let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(body) else {
        return RemoteError::Unknown;
    };

    match fields.remove("errors") {
        Some(Value::Null) | None => {}
        Some(errors) => return RemoteError::Validation { errors },
    }

    match fields.remove("error") {
        Some(Value::Null) | None => RemoteError::Unknown,
        Some(error) => RemoteError::Auth {
            error: text(error),
            error_description: fields
                .remove("error_description")
                .filter(|value| !value.is_null())
                .map(text),
        },
    }
}

fn text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

// The registration endpoint answers with a JSON string whose content is itself JSON.
// This second decode applies to that endpoint only.
pub fn decode_registration(wrapped: &str) -> Result<RegisterOutcome, RemoteError> {
    serde_json::from_str(wrapped).map_err(|err| RemoteError::Malformed(err.to_string()))
}

fn endpoint(base: &Url, path: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(path);
    }
    url
}

fn password_grant(username: &str, password: &str, credentials: &ClientCredentials) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair("username", username)
        .append_pair("password", password)
        .append_pair("client_id", &credentials.client_id)
        .append_pair("client_secret", &credentials.client_secret)
        .append_pair("grant_type", "password")
        .finish()
}

#[async_trait]
impl CommentsApi for CommentsClient {
    async fn register(&self, fields: RegistrationFields) -> Result<RegisterOutcome, RemoteError> {
        let mut fields = fields;
        fields.insert(
            "clientid".to_string(),
            Value::String(self.credentials.client_id.clone()),
        );

        let url = endpoint(&self.endpoints.auth, &["Membership", "RegisterProductUser"]);
        let request = self.http.post(url).header(ACCEPT, JSON).json(&fields);

        let wrapped: String = self.call("register", request).await?;
        let outcome = decode_registration(&wrapped);
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "registration payload did not decode.");
        }
        outcome
    }

    async fn login(&self, username: &str, password: &str) -> Result<Token, RemoteError> {
        let url = endpoint(&self.endpoints.auth, &["connect", "token"]);
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, FORM)
            .body(password_grant(username, password, &self.credentials));

        self.call("login", request).await
    }

    async fn get_sites(&self, token: &Token) -> Result<Vec<WebsiteRecord>, RemoteError> {
        let url = endpoint(&self.endpoints.api, &["GetWebsites"]);
        let request = self
            .bearer(self.http.post(url), token)
            .header(CONTENT_TYPE, JSON);

        let list: WebsiteList = self.call("get_sites", request).await?;
        Ok(list.data.unwrap_or_default())
    }

    async fn add_site(
        &self,
        token: &Token,
        req: &AddSiteRequest,
    ) -> Result<SiteEnvelope, RemoteError> {
        let url = endpoint(&self.endpoints.api, &["AddWebsite"]);
        let request = self.bearer(self.http.post(url), token).json(req);

        self.call("add_site", request).await
    }

    async fn update_site_settings(
        &self,
        token: &Token,
        params: &Value,
    ) -> Result<SiteEnvelope, RemoteError> {
        let url = endpoint(&self.endpoints.api, &["UpdateWebsiteSettings"]);
        let request = self
            .bearer(self.http.post(url), token)
            .header(CONTENT_TYPE, JSON_PATCH)
            .body(params.to_string());

        self.call("update_site_settings", request).await
    }

    async fn get_site_settings(
        &self,
        id: &str,
        token: &Token,
    ) -> Result<SiteSettings, RemoteError> {
        let mut url = endpoint(&self.endpoints.api, &["GetWebsiteSettings"]);
        url.query_pairs_mut().append_pair("id", id);
        let request = self
            .bearer(self.http.post(url), token)
            .header(CONTENT_TYPE, JSON_PATCH);

        let envelope: SettingsEnvelope = self.call("get_site_settings", request).await?;
        Ok(envelope.data)
    }
}
