use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Public Router Module
///
/// Endpoints accessible to any client, anonymous or logged-in. The listing and
/// the filter belong here because the filter is session side state independent
/// of authentication.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Lists snippets with the session filter applied and consumes the
        // pending flash message.
        .route("/", get(handlers::index))
        // GET/POST /filter
        // Shows and mutates the session's snippet filter. Blank fields clear
        // it; embedded whitespace is rejected with a flash.
        .route(
            "/filter",
            get(handlers::filter_form).post(handlers::filter_submit),
        )
}
