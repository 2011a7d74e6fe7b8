//! Create `advisor` table.
//!
//! Advisors are referenced by students and never mutated by the student flow.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Advisor::Table)
                    .if_not_exists()
                    .col(pk_auto(Advisor::Id))
                    .col(string_len(Advisor::Name, 128).not_null())
                    .col(string_len(Advisor::TaxId, 32).unique_key().not_null())
                    .col(timestamp_with_time_zone(Advisor::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Advisor::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Advisor { Table, Id, Name, TaxId, CreatedAt }
