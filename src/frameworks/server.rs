use crate::domain::ports::StateStore;
use crate::frameworks::{config, db};
use crate::interface_adapters::clients::{CommentsClient, Endpoints};
use crate::interface_adapters::gate::AdminKeyPolicy;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{AppState, InMemoryStateStore, PostgresStateStore};
use crate::use_cases::mirror::StateMirror;
use std::net::SocketAddr;
use std::sync::Arc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Postgres when DATABASE_URL is set, otherwise a process-local mirror.
async fn build_store() -> Option<Arc<dyn StateStore>> {
    let Some(database_url) = config::database_url() else {
        tracing::warn!("DATABASE_URL not set; cached token and site live in memory only.");
        return Some(Arc::new(InMemoryStateStore::default()));
    };

    postgres_store(&database_url).await
}

async fn postgres_store(database_url: &str) -> Option<Arc<dyn StateStore>> {
    let pool = match db::connect_pool(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "failed to connect to database");
            return None;
        }
    };

    if let Err(e) = db::run_migrations(&pool).await {
        tracing::error!(error = %e, "failed to run migrations");
        return None;
    }

    Some(Arc::new(PostgresStateStore { db: pool }))
}

// Serve the proxy on an already bound listener.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    let app = routes::app(Arc::new(state));
    axum::serve(listener, app).await
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let Some(credentials) = config::client_credentials() else {
        tracing::error!("COMMENTS_CLIENT_SECRET must be set");
        return;
    };

    let endpoints = match Endpoints::hosted() {
        Ok(endpoints) => endpoints,
        Err(e) => {
            tracing::error!(error = %e, "invalid comments service endpoint");
            return;
        }
    };

    let api = match CommentsClient::new(endpoints, credentials, config::remote_timeout()) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            tracing::error!(error = %e, "failed to build comments client");
            return;
        }
    };
    tracing::debug!("comments client configured.");

    let Some(store) = build_store().await else {
        return; // Abort startup when the configured store is unusable.
    };

    let admin_key = config::admin_api_key();
    if admin_key.is_none() {
        tracing::warn!("ADMIN_API_KEY not set; all admin routes will be denied.");
    }

    let state = AppState {
        api,
        store,
        access: Arc::new(AdminKeyPolicy::new(admin_key)),
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config::http_port()));
    tracing::info!(%addr, "listening");

    // Bind TCP listener with error handling.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };

    // Serve app and report errors rather than panicking.
    if let Err(e) = serve(listener, state).await {
        tracing::error!(error = %e, "server error");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Deactivation {
    NothingPersisted,
    Cleared,
    Failed,
}

// Only a database-backed mirror outlives the process, so only that one is cleared.
async fn clear_persisted_state(database_url: Option<String>) -> Deactivation {
    let Some(database_url) = database_url else {
        return Deactivation::NothingPersisted;
    };

    let Some(store) = postgres_store(&database_url).await else {
        return Deactivation::Failed;
    };

    match StateMirror::new(store).clear_all().await {
        Ok(()) => Deactivation::Cleared,
        Err(_) => Deactivation::Failed,
    }
}

// Uninstall hook: forget the cached token and site.
pub async fn deactivate() {
    let _ = dotenvy::dotenv();
    init_tracing();

    match clear_persisted_state(config::database_url()).await {
        Deactivation::NothingPersisted => {
            tracing::info!("DATABASE_URL not set; there is no persistent state to clear.")
        }
        Deactivation::Cleared => tracing::info!("cached token and site removed."),
        Deactivation::Failed => tracing::error!("failed to clear cached state."),
    }
}
