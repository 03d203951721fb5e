pub mod credentials;
pub mod sites;
pub mod widget;

use crate::domain::{RemoteError, SyncError, Token};
use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

// Error bodies are passed through in the shape the use case produced.
pub type ApiError = Response;

pub fn map_sync_error(err: SyncError) -> ApiError {
    match err {
        SyncError::Remote(remote) => {
            let status = match remote {
                RemoteError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                RemoteError::Auth { .. } => StatusCode::UNAUTHORIZED,
                RemoteError::Unknown | RemoteError::Malformed(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(remote)).into_response()
        }
        SyncError::Rejected { errors } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": true, "errors": errors})),
        )
            .into_response(),
        // Written back byte for byte.
        SyncError::Unaccepted(envelope) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(envelope)).into_response()
        }
        SyncError::NotAuthenticated => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "invalid_token",
                "error_description": "no cached access token; log in first"
            })),
        )
            .into_response(),
        SyncError::StorageFailure => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "storage error"})),
        )
            .into_response(),
    }
}

// Loads the cached token for operations that call the remote API on the admin's behalf.
pub(crate) async fn cached_token(state: &AppState) -> Result<Option<Token>, ApiError> {
    state
        .credentials()
        .cached_token()
        .await
        .map_err(map_sync_error)
}
