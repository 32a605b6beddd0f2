//! Credential handling for user logins.

pub mod password;

pub use password::CredentialHasher;
