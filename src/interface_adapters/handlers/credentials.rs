use crate::domain::{RegistrationFields, Token};
use crate::interface_adapters::handlers::{ApiError, map_sync_error};
use crate::interface_adapters::protocol::{LoginRequest, LogoutResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::widget::AdminStatus;
use axum::{Json, extract::State};
use std::sync::Arc;

#[tracing::instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Token>, ApiError> {
    let token = state
        .credentials()
        .login(&body.email, &body.password)
        .await
        .map_err(map_sync_error)?;

    tracing::info!("admin logged in; token cached.");
    Ok(Json(token))
}

#[tracing::instrument(name = "register", skip_all)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<RegistrationFields>,
) -> Result<Json<Token>, ApiError> {
    let token = state
        .credentials()
        .register(fields)
        .await
        .map_err(map_sync_error)?;

    tracing::info!("admin registered; token cached.");
    Ok(Json(token))
}

#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<LogoutResponse>, ApiError> {
    let result = state.credentials().logout().await.map_err(map_sync_error)?;

    tracing::info!("cached token and site cleared.");
    Ok(Json(LogoutResponse {
        success: result.success,
    }))
}

#[tracing::instrument(name = "status", skip_all)]
pub async fn status(State(state): State<Arc<AppState>>) -> Result<Json<AdminStatus>, ApiError> {
    let status = state.views().admin_status().await.map_err(map_sync_error)?;
    Ok(Json(status))
}
