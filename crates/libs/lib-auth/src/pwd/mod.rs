//! # Password Hashing
//!
//! Password hashing and verification using Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PwdError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),
}

/// Hash a password using the Argon2 algorithm.
pub fn hash_password(password: &str) -> Result<String, PwdError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PwdError::TooShort);
    }

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PwdError::Hash(e.to_string()))
}

/// Verify a plaintext password against an Argon2 hash.
///
/// A wrong password is `Ok(false)`; only an unreadable stored hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PwdError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| PwdError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing() {
        let password = "TestPassword123!";
        let hash = hash_password(password)
            .expect("Password hashing should succeed for valid password");

        assert!(verify_password(password, &hash)
            .expect("Password verification should succeed for correct password"));
        assert!(!verify_password("WrongPassword", &hash)
            .expect("Wrong password is a normal outcome, not an error"));
    }

    #[test]
    fn test_password_too_short() {
        let result = hash_password("short");

        assert_eq!(result, Err(PwdError::TooShort));
        assert_eq!(
            PwdError::TooShort.to_string(),
            "Password must be at least 8 characters long"
        );
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("TestPassword123!", "not-a-hash"),
            Err(PwdError::MalformedHash(_))
        ));
    }
}
