use axum::{
    Form,
    extract::{Path, State},
    response::{Html, Redirect},
};
use uuid::Uuid;

use crate::{
    AppState, auth,
    error::AppError,
    guard,
    models::{self, FilterForm, LoginForm, RegisterForm, SnippetFilter, SnippetForm},
    repository::RepoError,
    session::{AuthSession, Flash},
    views,
};

// --- Listing & Filtering ---

/// index
///
/// [Public Route] Lists snippets for anonymous and authenticated users alike,
/// narrowed by the session's stored filter when one is set. Consumes the
/// pending flash, which is how every post/redirect/get cycle in the
/// application reports its outcome.
pub async fn index(
    State(state): State<AppState>,
    session: AuthSession,
) -> Result<Html<String>, AppError> {
    let user = session.user().await?;
    let flash = session.take_flash().await?;
    let filter = session.filter().await?;

    let effective = filter.clone().unwrap_or_default();
    let snippets = state.repo.find_snippets(&effective).await?;

    Ok(views::index_page(
        user.as_deref(),
        flash.as_ref(),
        filter.as_ref(),
        &snippets,
    ))
}

/// filter_form
///
/// [Public Route] Shows the filter form, prefilled with the session's current
/// filter.
pub async fn filter_form(session: AuthSession) -> Result<Html<String>, AppError> {
    let user = session.user().await?;
    let flash = session.take_flash().await?;
    let filter = session.filter().await?;
    Ok(views::filter_page(user.as_deref(), flash.as_ref(), filter.as_ref()))
}

/// filter_submit
///
/// [Public Route] Updates the session filter. Both fields blank clears it
/// entirely; embedded whitespace in either field is rejected via flash and
/// leaves the stored filter unchanged.
pub async fn filter_submit(
    session: AuthSession,
    Form(form): Form<FilterForm>,
) -> Result<Redirect, AppError> {
    let tag = form.tag.trim();
    let owner = form.owner.trim();

    if tag.contains(char::is_whitespace) || owner.contains(char::is_whitespace) {
        session
            .set_flash(Flash::error("Filter values must not contain whitespace."))
            .await?;
        return Ok(Redirect::to("/filter"));
    }

    if tag.is_empty() && owner.is_empty() {
        session.clear_filter().await?;
        session.set_flash(Flash::success("Filter cleared.")).await?;
        return Ok(Redirect::to("/"));
    }

    session
        .set_filter(SnippetFilter {
            tag: (!tag.is_empty()).then(|| tag.to_string()),
            owner: (!owner.is_empty()).then(|| owner.to_string()),
        })
        .await?;
    session.set_flash(Flash::success("Filter applied.")).await?;
    Ok(Redirect::to("/"))
}

// --- Registration & Authentication ---

/// register_form
///
/// [Anonymous-Only Route] Shows the registration form.
pub async fn register_form(session: AuthSession) -> Result<Html<String>, AppError> {
    let flash = session.take_flash().await?;
    Ok(views::register_page(flash.as_ref()))
}

/// register_submit
///
/// [Anonymous-Only Route] Creates an account. Field violations and duplicate
/// usernames redirect back to the form with a flash; a successful registration
/// redirects to the login form. The raw password is hashed before it reaches
/// the store and is never logged.
pub async fn register_submit(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let username = match models::validate_username(&form.username) {
        Ok(username) => username,
        Err(message) => {
            session.set_flash(Flash::error(message)).await?;
            return Ok(Redirect::to("/register"));
        }
    };
    if let Err(message) = models::validate_password(&form.password) {
        session.set_flash(Flash::error(message)).await?;
        return Ok(Redirect::to("/register"));
    }

    let password_hash = auth::hash_password(&form.password)?;

    match state.repo.create_user(&username, &password_hash).await {
        Ok(user) => {
            tracing::info!(username = %user.username, "user registered");
            session
                .set_flash(Flash::success("Account created. Please log in."))
                .await?;
            Ok(Redirect::to("/login"))
        }
        Err(RepoError::DuplicateUsername) => {
            session
                .set_flash(Flash::error("That username is already taken."))
                .await?;
            Ok(Redirect::to("/register"))
        }
        Err(err) => Err(err.into()),
    }
}

/// login_form
///
/// [Anonymous-Only Route] Shows the login form.
pub async fn login_form(session: AuthSession) -> Result<Html<String>, AppError> {
    let flash = session.take_flash().await?;
    Ok(views::login_page(flash.as_ref()))
}

/// login_submit
///
/// [Anonymous-Only Route] Verifies credentials and, on success, performs the
/// `Anonymous -> Authenticated` transition (session id regeneration included).
/// Unknown usernames and wrong passwords produce the same flash.
pub async fn login_submit(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    match auth::authenticate(&state.repo, &form.username, &form.password).await? {
        Some(user) => {
            session.login(&user.username).await?;
            session
                .set_flash(Flash::success(format!("Welcome back, {}.", user.username)))
                .await?;
            Ok(Redirect::to("/"))
        }
        None => {
            tracing::debug!(username = %form.username, "invalid login attempt");
            session
                .set_flash(Flash::error("Invalid login attempt."))
                .await?;
            Ok(Redirect::to("/login"))
        }
    }
}

/// logout_submit
///
/// [Authenticated Route] Destroys the whole session record, filter included.
/// No flash survives the destruction; see DESIGN.md for the rationale.
pub async fn logout_submit(session: AuthSession) -> Result<Redirect, AppError> {
    session.logout().await?;
    Ok(Redirect::to("/"))
}

// --- Snippet CRUD ---

/// create_form
///
/// [Authenticated Route] Shows the new-snippet form.
pub async fn create_form(session: AuthSession) -> Result<Html<String>, AppError> {
    let user = guard::require_authentication(&session).await?;
    let flash = session.take_flash().await?;
    Ok(views::create_page(Some(&user), flash.as_ref()))
}

/// create_submit
///
/// [Authenticated Route] Creates a snippet owned by the session identity.
/// Tags are normalized before persistence.
pub async fn create_submit(
    State(state): State<AppState>,
    session: AuthSession,
    Form(form): Form<SnippetForm>,
) -> Result<Redirect, AppError> {
    let user = guard::require_authentication(&session).await?;

    if let Err(message) = models::validate_code(&form.code) {
        session.set_flash(Flash::error(message)).await?;
        return Ok(Redirect::to("/create"));
    }

    let tags = models::normalize_tags(&form.tags);
    state.repo.create_snippet(&form.code, &user, &tags).await?;

    session.set_flash(Flash::success("Snippet created.")).await?;
    Ok(Redirect::to("/"))
}

/// update_form
///
/// [Owner-Only Route] Shows the update form, prefilled from the snippet the
/// guard resolved.
pub async fn update_form(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let snippet = guard::require_owner(&state.repo, &session, id).await?;
    let user = session.user().await?;
    let flash = session.take_flash().await?;
    Ok(views::update_page(user.as_deref(), flash.as_ref(), &snippet))
}

/// update_submit
///
/// [Owner-Only Route] Rewrites code and tags; `owner` is untouched by design.
/// Losing the race against a concurrent delete is a reported outcome, not a
/// failure.
pub async fn update_submit(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
    Form(form): Form<SnippetForm>,
) -> Result<Redirect, AppError> {
    guard::require_owner(&state.repo, &session, id).await?;

    if let Err(message) = models::validate_code(&form.code) {
        session.set_flash(Flash::error(message)).await?;
        return Ok(Redirect::to(&format!("/{id}/update")));
    }

    let tags = models::normalize_tags(&form.tags);
    match state.repo.update_snippet(id, &form.code, &tags).await? {
        Some(_) => {
            session.set_flash(Flash::success("Snippet updated.")).await?;
        }
        None => {
            session
                .set_flash(Flash::error("The snippet was removed by another user."))
                .await?;
        }
    }
    Ok(Redirect::to("/"))
}

/// delete_form
///
/// [Owner-Only Route] Shows the delete confirmation.
pub async fn delete_form(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let snippet = guard::require_owner(&state.repo, &session, id).await?;
    let user = session.user().await?;
    let flash = session.take_flash().await?;
    Ok(views::delete_page(user.as_deref(), flash.as_ref(), &snippet))
}

/// delete_submit
///
/// [Owner-Only Route] Deletes the snippet. If another request deleted it
/// between the guard check and this statement, that outcome is reported.
pub async fn delete_submit(
    State(state): State<AppState>,
    session: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Redirect, AppError> {
    guard::require_owner(&state.repo, &session, id).await?;

    if state.repo.delete_snippet(id).await? {
        session.set_flash(Flash::success("Snippet deleted.")).await?;
    } else {
        session
            .set_flash(Flash::error("The snippet was removed by another user."))
            .await?;
    }
    Ok(Redirect::to("/"))
}

// --- Fallback ---

/// not_found
///
/// Router fallback for unknown paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
