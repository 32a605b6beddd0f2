//! JSON file-backed entity stores.

pub mod calculation_store;
pub mod user_store;

pub use calculation_store::FileCalculationStore;
pub use user_store::FileUserStore;
