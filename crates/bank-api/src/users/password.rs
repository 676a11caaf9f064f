// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing and verification using Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use tokio::sync::OnceCell;

use super::UserError;

/// Hash checked against when no account matches, so a miss costs the same
/// Argon2 work as a wrong password.
static DUMMY_HASH: OnceCell<String> = OnceCell::const_new();

/// Hashes a password and returns the PHC string (salt and parameters included).
pub fn hash_password(password: &str) -> Result<String, UserError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(format!("failed to hash password: {e}")))
}

/// Returns `true` if the password matches the stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, UserError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| UserError::PasswordHash(format!("invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| UserError::PasswordHash(format!("spawn_blocking failed: {e}")))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(password: String, hash: String) -> Result<bool, UserError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| UserError::PasswordHash(format!("spawn_blocking failed: {e}")))?
}

/// Burns one verification against a throwaway hash. Always `false`.
pub async fn verify_dummy(password: String) -> Result<bool, UserError> {
    let hash = DUMMY_HASH
        .get_or_try_init(|| hash_password_blocking(uuid::Uuid::new_v4().to_string()))
        .await?;

    verify_password_blocking(password, hash.clone())
        .await
        .map(|_| false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Correct1Horse").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("Correct1Horse", &hash).unwrap());
        assert!(!verify_password("correct1horse", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("Same1Password").unwrap();
        let b = hash_password("Same1Password").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("Correct1Horse".to_string()).await.unwrap();

        assert!(verify_password_blocking("Correct1Horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password_blocking("Wrong1Horse".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_dummy_verify_never_matches() {
        assert!(!verify_dummy("Correct1Horse".to_string()).await.unwrap());
        assert!(!verify_dummy(String::new()).await.unwrap());

        let hash = DUMMY_HASH.get().unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_invalid_hash_format() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(UserError::PasswordHash(_))
        ));
    }
}
