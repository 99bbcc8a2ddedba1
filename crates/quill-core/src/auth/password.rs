use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::config::PasswordMode;
use crate::error::QuillError;
use crate::models::User;

/// The one credential every account accepts in [`PasswordMode::Demo`].
pub const DEMO_PASSWORD: &str = "password";

/// Hash a plaintext password using Argon2.
pub fn hash_password(password: &str) -> Result<String, QuillError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| QuillError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, QuillError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| QuillError::Internal(format!("Invalid password hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Check `supplied` for `user` under `mode`.
///
/// Hashed mode refuses accounts that have no stored hash or whose stored hash
/// does not parse.
pub fn password_matches(mode: PasswordMode, user: &User, supplied: &str) -> Result<bool, QuillError> {
    match mode {
        PasswordMode::Demo => Ok(supplied == DEMO_PASSWORD),
        PasswordMode::Hashed => match user.password_hash.as_deref() {
            Some(hash) => Ok(verify_password(supplied, hash).unwrap_or_else(|err| {
                tracing::warn!(user_id = %user.id, error = %err, "stored password hash is unreadable");
                false
            })),
            None => Ok(false),
        },
    }
}
