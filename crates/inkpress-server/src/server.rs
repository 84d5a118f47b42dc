//! Router assembly and server lifecycle.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRef, State},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use inkpress_auth::{
    AdminAuth, AuthHttpState, AuthService, AuthState, SessionCache, login_handler, logout_handler,
    me_handler, register_handler,
};
use inkpress_db_memory::{MemorySessionStore, MemoryUserStorage, SessionStoreStats};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// State consumed by the auth handlers.
    pub http: AuthHttpState,

    /// Concrete session store, kept for the admin stats endpoint.
    pub sessions: Arc<MemorySessionStore>,
}

impl FromRef<AppState> for AuthHttpState {
    fn from_ref(state: &AppState) -> Self {
        state.http.clone()
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        AuthState::new(state.http.auth.clone(), state.http.cache.clone())
    }
}

/// Builds the application state from configuration, wiring the in-memory
/// backends.
#[must_use]
pub fn build_state(config: &AppConfig) -> AppState {
    let sessions = Arc::new(MemorySessionStore::new());
    let http = AuthHttpState {
        auth: Arc::new(AuthService::new(&config.auth)),
        cache: SessionCache::new(sessions.clone(), config.auth.cache_ttl),
        users: Arc::new(MemoryUserStorage::new()),
        admin: config.auth.admin.clone(),
        cookie: config.auth.cookie.clone(),
    };

    AppState { http, sessions }
}

/// Builds the router.
#[must_use]
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/me", get(me_handler))
        .route("/api/admin/sessions", get(session_stats_handler))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Admin-only view of session store telemetry.
async fn session_stats_handler(
    State(state): State<AppState>,
    AdminAuth(_): AdminAuth,
) -> Json<SessionStoreStats> {
    Json(state.sessions.stats())
}

/// A configured, bindable server.
pub struct InkpressServer {
    addr: SocketAddr,
    app: Router,
}

impl InkpressServer {
    /// Creates a server for the given address and router.
    #[must_use]
    pub fn new(addr: SocketAddr, app: Router) -> Self {
        Self { addr, app }
    }

    /// Binds the listener and serves until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails.
    pub async fn run(self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
