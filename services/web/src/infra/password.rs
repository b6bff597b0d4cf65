//! Argon2id password hashing.
//!
//! Hashes are stored in PHC string format, so algorithm parameters and the
//! random salt travel with the hash.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::EmployeeServiceError;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, EmployeeServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, EmployeeServiceError> {
    let parsed =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("parse stored password hash: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("verify password: {e}").into()),
    }
}
