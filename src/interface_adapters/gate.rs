use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

// Administrative capability check evaluated before every admin route.
pub trait AccessPolicy: Send + Sync {
    fn authorize(&self, headers: &HeaderMap) -> Access;
}

// Grants access to requests bearing the configured admin key.
// Without a configured key nothing is granted.
pub struct AdminKeyPolicy {
    admin_key: Option<String>,
}

impl AdminKeyPolicy {
    pub fn new(admin_key: Option<String>) -> Self {
        Self {
            admin_key: admin_key.filter(|key| !key.is_empty()),
        }
    }
}

impl AccessPolicy for AdminKeyPolicy {
    fn authorize(&self, headers: &HeaderMap) -> Access {
        let Some(expected) = self.admin_key.as_deref() else {
            return Access::Denied;
        };

        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        match presented {
            Some(presented) if same_secret(presented, expected) => Access::Granted,
            _ => Access::Denied,
        }
    }
}

// Compares without returning early on the first differing byte.
fn same_secret(presented: &str, expected: &str) -> bool {
    let (presented, expected) = (presented.as_bytes(), expected.as_bytes());
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

// Middleware: the policy's answer decides whether the handler runs at all.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    match state.access.authorize(request.headers()) {
        Access::Granted => Ok(next.run(request).await),
        Access::Denied => {
            tracing::warn!(path = %request.uri().path(), "admin request denied.");
            Err((
                StatusCode::FORBIDDEN,
                Json(ErrorResponse {
                    message: "forbidden".to_string(),
                }),
            ))
        }
    }
}
