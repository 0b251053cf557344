//! Password hashing via bcrypt.

use super::AuthError;

/// Default bcrypt cost factor.
pub const DEFAULT_COST: u32 = 10;

/// One-way salted password hasher.
///
/// The salt and cost are embedded in the encoded hash, so only the hash string
/// needs to be persisted.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AuthError::Hashing(format!("bcrypt hash: {e}")))
    }

    /// Verify a password against a bcrypt hash.
    ///
    /// Returns `Ok(false)` on mismatch and an error only when `hash` cannot be
    /// parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AuthError::Hashing(format!("bcrypt verify: {e}")))
    }
}
