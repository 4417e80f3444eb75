use async_trait::async_trait;
use snipbin::{
    error::AppError,
    guard::{self, Access},
    models::{Snippet, SnippetFilter, User},
    repository::{RepoError, Repository, RepositoryState},
    session::AuthSession,
};
use std::sync::Arc;
use tower_sessions::{MemoryStore, Session};
use uuid::Uuid;

// --- Mock Repository for Guard Logic ---

// The owner guard only needs snippet resolution; everything else is a stub.
#[derive(Default)]
struct MockGuardRepo {
    snippet_to_return: Option<Snippet>,
}

#[async_trait]
impl Repository for MockGuardRepo {
    async fn find_snippet(&self, _id: Uuid) -> Result<Option<Snippet>, RepoError> {
        Ok(self.snippet_to_return.clone())
    }

    // Minimal stubs for compilation
    async fn create_snippet(
        &self,
        _code: &str,
        _owner: &str,
        _tags: &[String],
    ) -> Result<Snippet, RepoError> {
        Ok(Snippet::default())
    }
    async fn find_snippets(&self, _filter: &SnippetFilter) -> Result<Vec<Snippet>, RepoError> {
        Ok(vec![])
    }
    async fn update_snippet(
        &self,
        _id: Uuid,
        _code: &str,
        _tags: &[String],
    ) -> Result<Option<Snippet>, RepoError> {
        Ok(None)
    }
    async fn delete_snippet(&self, _id: Uuid) -> Result<bool, RepoError> {
        Ok(false)
    }
    async fn create_user(&self, _username: &str, _password_hash: &str) -> Result<User, RepoError> {
        Ok(User::default())
    }
    async fn find_user(&self, _username: &str) -> Result<Option<User>, RepoError> {
        Ok(None)
    }
}

// --- Test Utilities ---

// A real session, detached from any HTTP plumbing.
fn fresh_session() -> AuthSession {
    AuthSession::new(Session::new(None, Arc::new(MemoryStore::default()), None))
}

async fn authenticated_session(username: &str) -> AuthSession {
    let session = fresh_session();
    session.login(username).await.unwrap();
    session
}

fn snippet_owned_by(owner: &str) -> Snippet {
    Snippet {
        owner: owner.to_string(),
        code: "let x = 1;".to_string(),
        ..Snippet::default()
    }
}

fn repo_with(snippet: Option<Snippet>) -> RepositoryState {
    Arc::new(MockGuardRepo {
        snippet_to_return: snippet,
    }) as RepositoryState
}

// --- Pure Decision Tests ---

#[test]
fn test_owner_access_missing_resource_is_not_found() {
    // Absence wins regardless of who is asking.
    assert_eq!(guard::owner_access(None, None), Access::NotFound);
    assert_eq!(guard::owner_access(Some("alice"), None), Access::NotFound);
}

#[test]
fn test_owner_access_anonymous_is_forbidden() {
    assert_eq!(guard::owner_access(None, Some("alice")), Access::Forbidden);
}

#[test]
fn test_owner_access_mismatch_is_forbidden() {
    assert_eq!(
        guard::owner_access(Some("bob"), Some("alice")),
        Access::Forbidden
    );
}

#[test]
fn test_owner_access_match_is_allow() {
    assert_eq!(guard::owner_access(Some("alice"), Some("alice")), Access::Allow);
}

// --- Async Guard Tests ---

#[tokio::test]
async fn test_require_owner_absent_snippet_is_not_found_even_when_authenticated() {
    let repo = repo_with(None);
    let session = authenticated_session("alice").await;

    let result = guard::require_owner(&repo, &session, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_require_owner_anonymous_is_forbidden() {
    let repo = repo_with(Some(snippet_owned_by("alice")));
    let session = fresh_session();

    let result = guard::require_owner(&repo, &session, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_require_owner_non_owner_is_forbidden() {
    let repo = repo_with(Some(snippet_owned_by("bob")));
    let session = authenticated_session("alice").await;

    let result = guard::require_owner(&repo, &session, Uuid::new_v4()).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_require_owner_owner_gets_the_snippet() {
    let repo = repo_with(Some(snippet_owned_by("alice")));
    let session = authenticated_session("alice").await;

    let snippet = guard::require_owner(&repo, &session, Uuid::new_v4())
        .await
        .expect("owner must be allowed");
    assert_eq!(snippet.owner, "alice");
}

#[tokio::test]
async fn test_require_authentication_states() {
    let session = fresh_session();
    assert!(matches!(
        guard::require_authentication(&session).await,
        Err(AppError::Forbidden)
    ));

    let session = authenticated_session("alice").await;
    assert_eq!(
        guard::require_authentication(&session).await.unwrap(),
        "alice"
    );
}

#[tokio::test]
async fn test_require_anonymity_states() {
    let session = fresh_session();
    assert!(guard::require_anonymity(&session).await.is_ok());

    let session = authenticated_session("alice").await;
    assert!(matches!(
        guard::require_anonymity(&session).await,
        Err(AppError::Forbidden)
    ));
}

#[tokio::test]
async fn test_logout_clears_every_session_field() {
    let session = authenticated_session("alice").await;
    session
        .set_filter(SnippetFilter {
            tag: Some("#rust".to_string()),
            owner: None,
        })
        .await
        .unwrap();

    session.logout().await.unwrap();

    assert_eq!(session.user().await.unwrap(), None);
    assert_eq!(session.filter().await.unwrap(), None);
    assert_eq!(session.take_flash().await.unwrap(), None);
}

#[tokio::test]
async fn test_flash_is_consumed_exactly_once() {
    use snipbin::session::Flash;

    let session = fresh_session();
    session
        .set_flash(Flash::success("Snippet created."))
        .await
        .unwrap();

    let first = session.take_flash().await.unwrap();
    assert_eq!(first, Some(Flash::success("Snippet created.")));

    let second = session.take_flash().await.unwrap();
    assert_eq!(second, None);
}
