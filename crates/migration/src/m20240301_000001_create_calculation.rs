//! Create `calculations` table.
//!
//! Client-defined fields are stored verbatim in a single JSON column.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Calculations::Table)
                    .if_not_exists()
                    .col(big_integer(Calculations::Id).primary_key().auto_increment())
                    .col(json(Calculations::Data).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Calculations::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Calculations { Table, Id, Data }
