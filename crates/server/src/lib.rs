pub mod errors;
pub mod routes;
pub mod state;
pub mod startup;

pub use startup::{build_app, run_with_config};
