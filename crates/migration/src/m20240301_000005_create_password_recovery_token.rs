//! Create `password_recovery_token` table.
//!
//! Only the sha-256 of a token is stored; the plaintext goes to the student.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PasswordRecoveryToken::Table)
                    .if_not_exists()
                    .col(pk_auto(PasswordRecoveryToken::Id))
                    .col(string_len(PasswordRecoveryToken::Email, 255).not_null())
                    .col(string_len(PasswordRecoveryToken::TokenHash, 64).unique_key().not_null())
                    .col(timestamp_with_time_zone(PasswordRecoveryToken::ExpiresAt).not_null())
                    .col(
                        ColumnDef::new(PasswordRecoveryToken::UsedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(PasswordRecoveryToken::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PasswordRecoveryToken::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PasswordRecoveryToken { Table, Id, Email, TokenHash, ExpiresAt, UsedAt, CreatedAt }
