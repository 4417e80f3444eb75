use argon2::Argon2;
use password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::{error::AppError, models::User, repository::RepositoryState};

/// hash_password
///
/// Derives an Argon2 PHC string from a raw password with a fresh random salt.
/// The raw password never leaves this function.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|_| password_hash::Error::Crypto)?;
    let salt = SaltString::encode_b64(&salt_bytes)?;
    let phc = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(phc)
}

/// verify_password
///
/// Verifies a raw password against a stored PHC string. A malformed stored
/// hash counts as a verification failure, not an error.
pub fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

/// authenticate
///
/// Resolves a username/password pair to a credential record. Returns `Ok(None)`
/// for both an unknown username and a wrong password, so callers cannot tell
/// the two apart. Store failures propagate.
pub async fn authenticate(
    repo: &RepositoryState,
    username: &str,
    password: &str,
) -> Result<Option<User>, AppError> {
    let Some(user) = repo.find_user(username).await? else {
        return Ok(None);
    };
    if verify_password(&user.password_hash, password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
