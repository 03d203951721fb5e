use serde::{Deserialize, Serialize};

// Request payload for the admin login form.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Query for fetching one site's settings.
#[derive(Debug, Deserialize)]
pub struct SiteSettingsQuery {
    pub id: String,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// Simple error envelope for failures that do not come from the remote service.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
