use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Anonymous-Only Router Module
///
/// Registration and login are reserved for sessions without an identity; an
/// already-authenticated caller is denied with Forbidden. The denial itself is
/// enforced by the `require_anonymity` middleware layered over this module in
/// `create_router`, keeping the rule in one place for both GET and POST.
pub fn anonymous_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /register
        // Account creation. Success redirects to the login form; duplicate
        // usernames and field violations redirect back here with a flash.
        .route(
            "/register",
            get(handlers::register_form).post(handlers::register_submit),
        )
        // GET/POST /login
        // Credential verification and the Anonymous -> Authenticated session
        // transition, including session-id regeneration.
        .route(
            "/login",
            get(handlers::login_form).post(handlers::login_submit),
        )
}
