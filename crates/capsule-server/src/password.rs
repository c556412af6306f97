use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use capsule_core::Failure;

/// Hash a password with Argon2id
///
/// # Errors
///
/// Returns an internal failure if hashing fails
pub fn hash(password: &str) -> Result<String, Failure> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Failure::internal(format!("password hashing failed: {e}")))
}

/// Verify a password against its stored hash
#[must_use]
pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
}
