//! SeaORM entity models for the Postgres backend.

pub mod errors;
pub mod db;
pub mod calculation;
pub mod user;

#[cfg(test)]
mod tests;
