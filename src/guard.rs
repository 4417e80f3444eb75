use uuid::Uuid;

use crate::{
    error::AppError, models::Snippet, repository::RepositoryState, session::AuthSession,
};

/// Access
///
/// Tagged outcome of an authorization decision. Keeping the decision a plain
/// value makes the contract testable without a store or a session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Forbidden,
    NotFound,
}

/// owner_access
///
/// The owner-only decision, pure. Evaluation order is part of the contract:
/// a missing resource reports `NotFound` regardless of who is asking, while an
/// existing resource reports `Forbidden` both to anonymous callers and to
/// authenticated non-owners, so non-owners learn nothing beyond "forbidden".
pub fn owner_access(identity: Option<&str>, owner: Option<&str>) -> Access {
    match (owner, identity) {
        (None, _) => Access::NotFound,
        (Some(_), None) => Access::Forbidden,
        (Some(owner), Some(user)) if owner == user => Access::Allow,
        _ => Access::Forbidden,
    }
}

/// require_anonymity
///
/// Guard for anonymous-only routes (register, login): a caller who already
/// holds an identity is denied.
pub async fn require_anonymity(session: &AuthSession) -> Result<(), AppError> {
    match session.user().await? {
        Some(_) => Err(AppError::Forbidden),
        None => Ok(()),
    }
}

/// require_authentication
///
/// Guard for authenticated-only routes (create, logout). Returns the acting
/// username so handlers never re-read the session key themselves.
pub async fn require_authentication(session: &AuthSession) -> Result<String, AppError> {
    session.user().await?.ok_or(AppError::Forbidden)
}

/// require_owner
///
/// Guard for owner-only routes (update, delete). Resolves the snippet first
/// (the decision depends on the resource), then applies `owner_access`. The
/// store lookup completes before any handler logic runs; a lookup failure
/// propagates instead of being treated as "absent".
///
/// On `Allow` the resolved snippet is handed to the caller so it is fetched
/// exactly once per request.
pub async fn require_owner(
    repo: &RepositoryState,
    session: &AuthSession,
    id: Uuid,
) -> Result<Snippet, AppError> {
    let snippet = repo.find_snippet(id).await?;
    let identity = session.user().await?;
    match owner_access(
        identity.as_deref(),
        snippet.as_ref().map(|s| s.owner.as_str()),
    ) {
        Access::Allow => snippet.ok_or(AppError::NotFound),
        Access::Forbidden => Err(AppError::Forbidden),
        Access::NotFound => Err(AppError::NotFound),
    }
}
