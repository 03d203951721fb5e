use crate::interface_adapters::gate::require_admin;
use crate::interface_adapters::handlers::credentials::{login, logout, register, status};
use crate::interface_adapters::handlers::sites::{
    add_site, site_settings, sites, update_site_settings,
};
use crate::interface_adapters::handlers::widget::{health, widget_config};
use crate::interface_adapters::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

// Route group the admin UI talks to.
pub const NAMESPACE: &str = "/jv_comments/v1";

pub fn app(state: Arc<AppState>) -> Router {
    // Every admin route passes the access policy before its handler runs.
    let admin = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/sites", get(sites))
        .route("/add_site", post(add_site))
        .route("/update_site_settings", post(update_site_settings))
        .route("/site_settings", get(site_settings))
        .route("/logout", get(logout))
        .route("/status", get(status))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let public = Router::new().route("/widget/config", get(widget_config));

    Router::new()
        .route("/health", get(health))
        .nest(NAMESPACE, admin.merge(public))
        .with_state(state)
}
