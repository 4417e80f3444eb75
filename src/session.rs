use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::{error::AppError, models::SnippetFilter};

// Well-known session keys. All session reads and writes go through AuthSession
// so the keys never leak into handlers.
const USER_KEY: &str = "user";
const FILTER_KEY: &str = "filter";
const FLASH_KEY: &str = "flash";

/// FlashKind
///
/// Visual category of a flash message, rendered as a CSS class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

/// Flash
///
/// A one-shot, session-carried notification consumed by the next rendered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }
}

/// AuthSession
///
/// The session state machine: `Anonymous` (no `user` key) or `Authenticated`
/// (`user` holds a username), plus the authentication-independent side state
/// (`filter`) and the one-shot `flash`.
///
/// Wraps the cookie-backed `tower_sessions::Session` and is extracted directly
/// in handlers and middleware.
#[derive(Debug, Clone)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Returns the authenticated username, if any.
    pub async fn user(&self) -> Result<Option<String>, AppError> {
        Ok(self.session.get::<String>(USER_KEY).await?)
    }

    /// login
    ///
    /// Transition `Anonymous -> Authenticated`. The session identifier is
    /// regenerated *before* the identity is written, so a fixated pre-login
    /// cookie never names an authenticated record. If regeneration fails the
    /// error propagates and the state remains `Anonymous`.
    pub async fn login(&self, username: &str) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session.insert(USER_KEY, username.to_string()).await?;
        Ok(())
    }

    /// logout
    ///
    /// Transition `Authenticated -> Anonymous`. Destroys the entire session
    /// record, not just the `user` key: the filter and any other per-session
    /// data go with it.
    pub async fn logout(&self) -> Result<(), AppError> {
        self.session.flush().await?;
        Ok(())
    }

    pub async fn set_flash(&self, flash: Flash) -> Result<(), AppError> {
        self.session.insert(FLASH_KEY, flash).await?;
        Ok(())
    }

    /// take_flash
    ///
    /// Reads and clears the pending flash in one step; the message is consumed
    /// exactly once, by the render that follows the write.
    pub async fn take_flash(&self) -> Result<Option<Flash>, AppError> {
        Ok(self.session.remove::<Flash>(FLASH_KEY).await?)
    }

    pub async fn filter(&self) -> Result<Option<SnippetFilter>, AppError> {
        Ok(self.session.get::<SnippetFilter>(FILTER_KEY).await?)
    }

    pub async fn set_filter(&self, filter: SnippetFilter) -> Result<(), AppError> {
        self.session.insert(FILTER_KEY, filter).await?;
        Ok(())
    }

    pub async fn clear_filter(&self) -> Result<(), AppError> {
        self.session.remove::<SnippetFilter>(FILTER_KEY).await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
