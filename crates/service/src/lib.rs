//! Service layer for calculations and users.
//! - `storage` defines the per-entity store contract; `file` and `repo` implement it.
//! - `calculation_service` / `user_service` hold the CRUD and credential rules.
//! - Errors surface as [`errors::ServiceError`] for the HTTP layer to map.

pub mod errors;
pub mod domain;
pub mod storage;
pub mod file;
pub mod repo;
pub mod auth;
pub mod calculation_service;
pub mod user_service;
pub mod runtime;
#[cfg(test)]
pub mod test_support;

pub use calculation_service::CalculationService;
pub use user_service::UserService;
