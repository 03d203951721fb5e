use crate::interface_adapters::handlers::{ApiError, map_sync_error};
use crate::interface_adapters::state::AppState;
use crate::use_cases::widget::{EmbedContext, WidgetConfig};
use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

// Public: the embed script asks whether to render on the current page.
pub async fn widget_config(
    State(state): State<Arc<AppState>>,
    Query(page): Query<EmbedContext>,
) -> Result<Json<WidgetConfig>, ApiError> {
    let config = state
        .views()
        .widget_config(&page)
        .await
        .map_err(map_sync_error)?;

    Ok(Json(config))
}

pub async fn health() -> &'static str {
    "ok"
}
