use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod session;
pub mod views;

// Module for routing segregation (Public, Anonymous-only, Authenticated, Owner-only).
pub mod routes;
use routes::{anonymous, authenticated, owner, public};

use config::Env;
use error::AppError;
use session::AuthSession;

// --- Public Re-exports ---

// Makes core state types easily accessible to the main application entry point (main.rs).
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};

/// AppState
///
/// The single, thread-safe, immutable container holding all essential
/// application services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: abstracts credential and snippet persistence.
    pub repo: RepositoryState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// These implementations allow handlers to selectively pull components from the shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// authentication_middleware
///
/// Route-layer guard for authenticated-only modules. Sessions without an
/// identity are rejected with the guard's Forbidden outcome before the handler
/// runs.
async fn authentication_middleware(
    session: AuthSession,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard::require_authentication(&session).await?;
    Ok(next.run(request).await)
}

/// anonymity_middleware
///
/// The mirror image: register and login are off-limits once a session holds an
/// identity.
async fn anonymity_middleware(
    session: AuthSession,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    guard::require_anonymity(&session).await?;
    Ok(next.run(request).await)
}

/// create_router
///
/// Assembles the application's entire routing structure, applies global and
/// scoped middleware, and registers the application state. The session layer
/// wraps everything so every route (and both guard middlewares) can extract
/// the cookie-backed session.
pub fn create_router(state: AppState) -> Router {
    // 1. Session Transport
    // Server-side records keyed by a cookie-carried id. Strict same-site and
    // HttpOnly by construction; Secure is enabled outside local development.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_name(state.config.session_name.clone())
        .with_same_site(SameSite::Strict)
        .with_secure(state.config.env == Env::Production)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Public Routes: listing and filter, no guard.
        .merge(public::public_routes())
        // Anonymous-Only Routes: register/login, denied to identified sessions.
        .merge(
            anonymous::anonymous_routes()
                .route_layer(middleware::from_fn(anonymity_middleware)),
        )
        // Authenticated Routes: create/logout, denied to anonymous sessions.
        .merge(
            authenticated::authenticated_routes()
                .route_layer(middleware::from_fn(authentication_middleware)),
        )
        // Owner-Only Routes: update/delete; the guard runs inside the handlers
        // because the verdict depends on the resolved snippet.
        .merge(owner::owner_routes())
        // Unknown paths get the generic 404 page.
        .fallback(handlers::not_found)
        // Apply the Unified State to all routes.
        .with_state(state);

    // 3. Observability, Correlation and Session Layers (applied outermost/first)
    base_router.layer(
        ServiceBuilder::new()
            // 3a. Request ID Generation: a unique UUID for every incoming request.
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            // 3b. Request Tracing: wraps the request/response lifecycle in a span
            // correlated by the generated request id.
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            // 3c. Request ID Propagation: returns the x-request-id header to the client.
            .layer(PropagateRequestIdLayer::new(x_request_id))
            // 3d. Session layer, innermost so session work is traced.
            .layer(session_layer),
    )
}

/// trace_span_logger
///
/// Helper used by `TraceLayer` to customize span creation: the `x-request-id`
/// header (if present) is included in the structured logging metadata alongside
/// the HTTP method and URI, so every log line for a request is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
