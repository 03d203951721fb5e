use std::{env, time::Duration};

use crate::interface_adapters::clients::ClientCredentials;

// Runtime configuration, read from the environment (a local .env is loaded first).

pub const DEFAULT_CLIENT_ID: &str = "wpClient";

pub fn http_port() -> u16 {
    env::var("COMMENTS_SYNC_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3004)
}

// The shared secret is never compiled in; without it there is no client.
pub fn client_credentials() -> Option<ClientCredentials> {
    let client_secret = non_empty("COMMENTS_CLIENT_SECRET")?;
    let client_id = non_empty("COMMENTS_CLIENT_ID").unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string());
    Some(ClientCredentials {
        client_id,
        client_secret,
    })
}

pub fn admin_api_key() -> Option<String> {
    non_empty("ADMIN_API_KEY")
}

pub fn database_url() -> Option<String> {
    non_empty("DATABASE_URL")
}

// Transport timeout for remote calls. Failed calls are not retried.
pub fn remote_timeout() -> Duration {
    let millis = env::var("REMOTE_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(10_000);
    Duration::from_millis(millis)
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
