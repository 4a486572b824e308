use bcrypt::{BcryptError, hash, verify};

const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, HASH_COST)
}

/// Check a login attempt against the configured admin hash. Malformed hashes
/// count as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    match verify(password, hashed) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!("Password verification error: {}", e);
            false
        }
    }
}
