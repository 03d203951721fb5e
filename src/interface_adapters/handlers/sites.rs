use crate::domain::{AddSiteRequest, AddedSite, SiteEnvelope, SiteSettings, SiteSummary};
use crate::interface_adapters::handlers::{ApiError, cached_token, map_sync_error};
use crate::interface_adapters::protocol::SiteSettingsQuery;
use crate::interface_adapters::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use std::sync::Arc;

#[tracing::instrument(name = "get_sites", skip_all)]
pub async fn sites(State(state): State<Arc<AppState>>) -> Result<Json<Vec<SiteSummary>>, ApiError> {
    let token = cached_token(&state).await?;
    let sites = state.sites().get_sites(token.as_ref()).await;

    tracing::debug!(count = sites.len(), "sites listed.");
    Ok(Json(sites))
}

#[tracing::instrument(name = "add_site", skip_all, fields(url = %body.url))]
pub async fn add_site(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddSiteRequest>,
) -> Result<Json<AddedSite>, ApiError> {
    let token = cached_token(&state).await?;
    let added = state
        .sites()
        .add_site(token.as_ref(), body)
        .await
        .map_err(map_sync_error)?;

    Ok(Json(added))
}

#[tracing::instrument(name = "update_site_settings", skip_all)]
pub async fn update_site_settings(
    State(state): State<Arc<AppState>>,
    Json(params): Json<Value>,
) -> Result<Json<SiteEnvelope>, ApiError> {
    let token = cached_token(&state).await?;
    let response = state
        .sites()
        .update_site_settings(token.as_ref(), params)
        .await
        .map_err(map_sync_error)?;

    Ok(Json(response))
}

#[tracing::instrument(name = "get_site_settings", skip_all, fields(id = %query.id))]
pub async fn site_settings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SiteSettingsQuery>,
) -> Result<Json<SiteSettings>, ApiError> {
    let token = cached_token(&state).await?;
    let settings = state
        .sites()
        .get_site_settings(&query.id, token.as_ref())
        .await
        .map_err(map_sync_error)?;

    Ok(Json(settings))
}
