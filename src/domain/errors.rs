use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::fmt;

use crate::domain::remote::SiteEnvelope;

// Uniform error contract for every remote call.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteError {
    // Field-level validation failures: `{errors: ...}`.
    Validation { errors: Value },
    // OAuth-style failures from the auth issuer: `{error, error_description}`.
    Auth {
        error: String,
        error_description: Option<String>,
    },
    // Any other failed response, including transport failures.
    Unknown,
    // A 200 response whose body does not match the operation's schema.
    // Reported to callers as `Unknown`.
    Malformed(String),
}

impl Serialize for RemoteError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            RemoteError::Validation { errors } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("errors", errors)?;
                map.end()
            }
            RemoteError::Auth {
                error,
                error_description,
            } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("error", error)?;
                map.serialize_entry("error_description", error_description)?;
                map.end()
            }
            RemoteError::Unknown | RemoteError::Malformed(_) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", "unknown")?;
                map.end()
            }
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Validation { .. } => write!(f, "remote validation failed"),
            RemoteError::Auth {
                error,
                error_description: Some(description),
            } => write!(f, "remote auth error {error}: {description}"),
            RemoteError::Auth { error, .. } => write!(f, "remote auth error {error}"),
            RemoteError::Unknown => write!(f, "unknown remote error"),
            RemoteError::Malformed(detail) => write!(f, "malformed remote response: {detail}"),
        }
    }
}

impl std::error::Error for RemoteError {}

// Errors surfaced by the credential broker and site registry.
#[derive(Debug)]
pub enum SyncError {
    Remote(RemoteError),
    // A 200 response that carried field errors; reported as `{error: true, errors}`.
    Rejected { errors: Value },
    // A site response without `websiteId`; returned to the caller untouched.
    Unaccepted(SiteEnvelope),
    // No cached token for an operation that needs one.
    NotAuthenticated,
    StorageFailure,
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Remote(err) => write!(f, "{err}"),
            SyncError::Rejected { .. } => write!(f, "remote rejected the request"),
            SyncError::Unaccepted(_) => write!(f, "remote response has no websiteId"),
            SyncError::NotAuthenticated => write!(f, "no cached access token"),
            SyncError::StorageFailure => write!(f, "state storage failure"),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<RemoteError> for SyncError {
    fn from(err: RemoteError) -> Self {
        SyncError::Remote(err)
    }
}
