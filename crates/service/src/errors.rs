use thiserror::Error;

use crate::storage::StoreError;

/// Why a login attempt was rejected. The display strings are the exact
/// messages returned to the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    #[error("User not found")]
    UserNotFound,
    #[error("Wrong password")]
    WrongPassword,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("email already exists")]
    DuplicateEmail,
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthFailure),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ServiceError::DuplicateEmail,
            StoreError::Storage(msg) => ServiceError::Internal(msg),
        }
    }
}
