use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use rand_core::OsRng;

/// Hash with Argon2id and a fresh salt; returns the PHC string.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}
