//! Argon2id password hashing.
//!
//! Hashing is CPU-bound; the async wrappers run it on the blocking pool.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password hashing task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash `plain` with a fresh random salt, returning the PHC string.
pub fn hash_blocking(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// `true` when `plain` matches `digest`. Unparsable digests never match.
pub fn verify_blocking(plain: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

pub async fn hash_password(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_blocking(&plain)).await?
}

/// A failed hashing task counts as a mismatch.
pub async fn verify_password(plain: String, digest: String) -> bool {
    tokio::task::spawn_blocking(move || verify_blocking(&plain, &digest))
        .await
        .unwrap_or(false)
}
