use crate::error::AppError;

/// bcrypt cost used for new hashes.
pub const HASH_COST: u32 = bcrypt::DEFAULT_COST;

pub fn hash_password(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, HASH_COST)
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

/// Compare a plaintext password with a stored hash. A corrupt hash counts as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
