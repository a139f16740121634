//! Password hashing and verification.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`) with a fresh random
//! salt per call, so the same password never hashes to the same value twice.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

/// Hash a plaintext password.
///
/// Only fails when the OS entropy source or the hasher itself is unusable.
pub fn hash(plaintext: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

/// Check a plaintext password against a stored hash.
///
/// Returns `false` for a wrong password and for a hash that does not parse.
pub fn verify(plaintext: &str, hashed: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hashed) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(plaintext.as_bytes(), &parsed)
        .is_ok()
}
