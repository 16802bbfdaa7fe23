use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

pub(crate) const PASSWORD_MIN: usize = 8;

#[derive(Error, Debug)]
pub(crate) enum AuthError {
    #[error("Failed to hash password")]
    Hash,

    #[error("Invalid credentials")]
    InvalidCredentials,
}

pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt).map_err(|error| {
        tracing::error!(error = %error, "password hashing failed");
        AuthError::Hash
    })?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash).map_err(|error| {
        tracing::error!(error = %error, "stored password hash is unreadable");
        AuthError::InvalidCredentials
    })?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).is_ok());
        assert!(verify_password("wrong password", &hash).is_err());
    }

    #[test]
    fn test_garbage_hash_is_invalid() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
