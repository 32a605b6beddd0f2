//! Salted argon2id password hashing.

use argon2::{
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use rand::rngs::OsRng;

use crate::errors::ServiceError;

/// Hashes new passwords with the configured argon2id cost and verifies
/// candidates against stored PHC strings.
///
/// Verification reads the parameters embedded in the stored hash, so hashes
/// written under an older cost setting keep verifying after it changes.
#[derive(Clone, Debug)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self { params: Params::default() }
    }
}

impl CredentialHasher {
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, ServiceError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ServiceError::Internal(format!("invalid argon2 params: {e}")))?;
        Ok(Self { params })
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Result<Self, ServiceError> {
        Self::new(cfg.hash_memory_kib, cfg.hash_iterations, cfg.hash_parallelism)
    }

    fn argon(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt into a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::Internal(format!("hashing error: {e}")))?
            .to_string();
        Ok(hash)
    }

    /// Whether `password` matches the stored PHC string.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, ServiceError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| ServiceError::Internal(format!("stored hash unreadable: {e}")))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ServiceError::Internal(format!("verify error: {e}"))),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, password: String) -> Result<String, ServiceError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(&self, password: String, stored: String) -> Result<bool, ServiceError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
    }
}
