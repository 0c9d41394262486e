//! argon2id password hashing.

use crate::identity::domain::IdentityError;
use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
};

/// Hashes a plain-text password into a PHC-format argon2id string.
///
/// # Errors
///
/// Returns [`IdentityError::EmptyPassword`] for an empty password or
/// [`IdentityError::PasswordHashing`] when hashing fails.
pub fn hash_password(password: &str) -> Result<String, IdentityError> {
    if password.is_empty() {
        return Err(IdentityError::EmptyPassword);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| IdentityError::PasswordHashing(err.to_string()))
}

/// Verifies a plain-text password against a PHC-format hash.
///
/// Malformed hashes never verify.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}
