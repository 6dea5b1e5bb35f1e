//! Account registration and credential verification.
//!
//! Passwords are stored as argon2id PHC strings; verification goes through
//! `Argon2::verify_password`, never a string comparison.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use tracing::info;

use crate::db::Storage;
use crate::error::DeskError;
use crate::session::Identity;
use crate::types::Role;

pub fn hash_password(password: &str) -> Result<String, DeskError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DeskError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, stored: &str) -> Result<bool, DeskError> {
    let parsed = PasswordHash::new(stored).map_err(|e| DeskError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Create a new account. Fails with `InvalidInput` for empty fields or an
/// unrecognized role, and with `DuplicateUsername` when the name is taken.
pub async fn register(
    storage: &Storage,
    username: &str,
    password: &str,
    role: &str,
) -> Result<i64, DeskError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(DeskError::InvalidInput(
            "Fill in all fields correctly.".to_string(),
        ));
    }
    let Some(role) = Role::parse(role) else {
        return Err(DeskError::InvalidInput(
            "Fill in all fields correctly.".to_string(),
        ));
    };

    let hash = hash_password(password)?;
    let user_id = storage.create_user(username, &hash, role).await?;
    info!(user_id, role = %role, "account registered");
    Ok(user_id)
}

/// Resolve credentials to an identity. Unknown usernames and wrong
/// passwords both surface as the same `InvalidCredentials` failure.
pub async fn authenticate(
    storage: &Storage,
    username: &str,
    password: &str,
) -> Result<Identity, DeskError> {
    let Some(user) = storage.find_user_by_username(username.trim()).await? else {
        return Err(DeskError::InvalidCredentials);
    };
    if !verify_password(password, &user.password)? {
        return Err(DeskError::InvalidCredentials);
    }
    Ok(Identity {
        user_id: user.id,
        username: user.username,
        role: user.role,
    })
}
