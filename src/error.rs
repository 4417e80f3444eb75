use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{repository::RepoError, views};

/// AppError
///
/// The application-wide error taxonomy. Handlers convert recoverable conditions
/// (field validation, invalid credentials) into flash messages and redirects long
/// before they reach this type; whatever does surface here is rendered as a
/// generic boundary-level error page.
///
/// `Forbidden` and `NotFound` are deliberately indistinct in their page content so
/// that an ownership mismatch does not reveal more about a resource than "forbidden".
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad field constraints (length, required, uniqueness). Normally reported via
    /// flash + redirect; this variant only renders if a handler lets one escape.
    #[error("{0}")]
    Validation(String),

    /// Authorization guard denial: the session identity may not perform the action.
    #[error("forbidden")]
    Forbidden,

    /// The requested resource does not exist (or the route is unknown).
    #[error("not found")]
    NotFound,

    /// Store unavailable or a query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The session store failed to load, persist, regenerate or destroy a record.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Argon2 hashing or PHC-string parsing failed.
    #[error("password hashing error: {0}")]
    PasswordHash(#[from] password_hash::Error),
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::DuplicateUsername => {
                AppError::Validation("That username is already taken.".to_string())
            }
            RepoError::Backend(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                views::error_page(StatusCode::BAD_REQUEST, &msg),
            )
                .into_response(),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                views::error_page(StatusCode::FORBIDDEN, "You are not allowed to do that."),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                views::error_page(StatusCode::NOT_FOUND, "The page you requested does not exist."),
            )
                .into_response(),
            // Infrastructure failures are logged server-side and kept opaque to the client.
            AppError::Database(ref e) => {
                tracing::error!("database failure: {:?}", e);
                internal_error_response()
            }
            AppError::Session(ref e) => {
                tracing::error!("session store failure: {:?}", e);
                internal_error_response()
            }
            AppError::PasswordHash(ref e) => {
                tracing::error!("password hashing failure: {:?}", e);
                internal_error_response()
            }
        }
    }
}

fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        views::error_page(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong."),
    )
        .into_response()
}
