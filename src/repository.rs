use crate::models::{Snippet, SnippetFilter, User};
use async_trait::async_trait;
use sqlx::{PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// RepoError
///
/// Persistence failures as the handlers need to distinguish them: a duplicate
/// username is a user-correctable validation outcome, everything else is an
/// infrastructure failure that propagates to the error boundary.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("username is already taken")]
    DuplicateUsername,
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations, covering both
/// the credential store and the snippet store. Handlers interact with the data
/// layer through this trait without knowing the concrete implementation
/// (Postgres in production, in-memory mocks in tests).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task
/// boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Snippet Store ---

    /// Inserts a new snippet owned by `owner`. Tags must already be normalized.
    async fn create_snippet(
        &self,
        code: &str,
        owner: &str,
        tags: &[String],
    ) -> Result<Snippet, RepoError>;

    /// Retrieves a snippet by id; `None` when absent.
    async fn find_snippet(&self, id: Uuid) -> Result<Option<Snippet>, RepoError>;

    /// Lists snippets, optionally narrowed by exact tag and/or exact owner
    /// (conjunctive), most recently updated first.
    async fn find_snippets(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>, RepoError>;

    /// Rewrites `code` and `tags` of an existing snippet. `owner` is never
    /// touched. Returns `None` when the snippet no longer exists, which callers
    /// must treat as a concurrent removal rather than a failure.
    async fn update_snippet(
        &self,
        id: Uuid,
        code: &str,
        tags: &[String],
    ) -> Result<Option<Snippet>, RepoError>;

    /// Deletes a snippet by id. Returns false when there was nothing to delete.
    async fn delete_snippet(&self, id: Uuid) -> Result<bool, RepoError>;

    // --- Credential Store ---

    /// Inserts a new credential record. The username must already be validated
    /// and trimmed, the password already hashed. Uniqueness violations surface
    /// as `RepoError::DuplicateUsername`.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError>;

    /// Retrieves a credential record by username; `None` when unknown.
    async fn find_user(&self, username: &str) -> Result<Option<User>, RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Uses the runtime query API throughout; single-row statements are the
/// atomicity unit, so concurrent mutations of the same snippet resolve to
/// exactly one winner without in-process locking.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create_snippet(
        &self,
        code: &str,
        owner: &str,
        tags: &[String],
    ) -> Result<Snippet, RepoError> {
        let snippet = sqlx::query_as::<_, Snippet>(
            r#"
            INSERT INTO snippets (id, code, owner, tags, created_at, updated_at)
            VALUES ($1, $2, $3, $4, NOW(), NOW())
            RETURNING id, code, owner, tags, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(owner)
        .bind(tags)
        .fetch_one(&self.pool)
        .await?;
        Ok(snippet)
    }

    async fn find_snippet(&self, id: Uuid) -> Result<Option<Snippet>, RepoError> {
        let snippet = sqlx::query_as::<_, Snippet>(
            "SELECT id, code, owner, tags, created_at, updated_at FROM snippets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(snippet)
    }

    /// find_snippets
    ///
    /// Implements the optional tag/owner filter with QueryBuilder for safe
    /// parameterization. Tag matching is exact against the stored array.
    async fn find_snippets(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>, RepoError> {
        let mut builder: QueryBuilder<sqlx::Postgres> =
            QueryBuilder::new("SELECT id, code, owner, tags, created_at, updated_at FROM snippets");

        let mut has_where = false;
        if let Some(tag) = &filter.tag {
            builder.push(" WHERE ");
            builder.push_bind(tag.clone());
            builder.push(" = ANY(tags)");
            has_where = true;
        }
        if let Some(owner) = &filter.owner {
            builder.push(if has_where { " AND " } else { " WHERE " });
            builder.push("owner = ");
            builder.push_bind(owner.clone());
        }

        builder.push(" ORDER BY updated_at DESC");

        let snippets = builder
            .build_query_as::<Snippet>()
            .fetch_all(&self.pool)
            .await?;
        Ok(snippets)
    }

    /// update_snippet
    ///
    /// `owner` is intentionally absent from the SET list. A `None` result means
    /// the row vanished between the caller's guard check and this statement.
    async fn update_snippet(
        &self,
        id: Uuid,
        code: &str,
        tags: &[String],
    ) -> Result<Option<Snippet>, RepoError> {
        let snippet = sqlx::query_as::<_, Snippet>(
            r#"
            UPDATE snippets
            SET code = $2, tags = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, code, owner, tags, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(tags)
        .fetch_optional(&self.pool)
        .await?;
        Ok(snippet)
    }

    async fn delete_snippet(&self, id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// create_user
    ///
    /// Relies on the unique constraint on `users.username` rather than a
    /// lookup-then-insert sequence, so concurrent registrations of the same
    /// name resolve to exactly one winner.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, RepoError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepoError::DuplicateUsername,
            _ => RepoError::Backend(e),
        })
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
