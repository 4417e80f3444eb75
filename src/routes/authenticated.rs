use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Routes requiring a session identity but no resource ownership. The
/// `require_authentication` middleware layered over this module in
/// `create_router` rejects anonymous callers before any handler runs; the
/// handlers still obtain the acting username through the guard rather than
/// reading the session key directly.
pub fn authenticated_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /create
        // New-snippet form and creation. The snippet's owner is fixed to the
        // session identity at creation and never reassigned.
        .route(
            "/create",
            get(handlers::create_form).post(handlers::create_submit),
        )
        // POST /logout
        // Destroys the entire session record (identity, filter, everything).
        .route("/logout", post(handlers::logout_submit))
}
