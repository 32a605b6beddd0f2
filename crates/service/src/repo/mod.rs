pub mod seaorm;

pub use seaorm::{SeaOrmCalculationStore, SeaOrmUserStore};
