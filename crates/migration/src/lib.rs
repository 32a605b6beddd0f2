//! Migrator for the calculation and user tables.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_calculation;
mod m20240301_000002_create_user;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_calculation::Migration),
            Box::new(m20240301_000002_create_user::Migration),
        ]
    }
}
