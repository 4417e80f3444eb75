use crate::{AppState, handlers};
use axum::{
    Router,
    routing::get,
};

/// Owner-Only Router Module
///
/// Update and delete on a specific snippet. These routes carry no module-level
/// guard layer: the verdict depends on the resolved resource (absent id must
/// report NotFound before authentication state is even considered), so each
/// handler invokes `guard::require_owner` as its first step.
///
/// Resource ids bind through structured path parameters (`Path<Uuid>`); a
/// malformed id never reaches a handler.
pub fn owner_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /{id}/update
        // Prefilled edit form and the code/tags rewrite. `owner` is immutable.
        .route(
            "/{id}/update",
            get(handlers::update_form).post(handlers::update_submit),
        )
        // GET/POST /{id}/delete
        // Confirmation form and deletion.
        .route(
            "/{id}/delete",
            get(handlers::delete_form).post(handlers::delete_submit),
        )
}
