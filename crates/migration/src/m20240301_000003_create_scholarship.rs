//! Create `scholarship` table, one row per student.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Scholarship::Table)
                    .if_not_exists()
                    .col(pk_auto(Scholarship::Id))
                    .col(integer(Scholarship::StudentId).unique_key().not_null())
                    .col(date(Scholarship::ScholarshipStartsAt).not_null())
                    .col(date(Scholarship::ScholarshipEndsAt).not_null())
                    .col(timestamp_with_time_zone(Scholarship::CreatedAt).not_null())
                    .check(
                        Expr::col(Scholarship::ScholarshipStartsAt)
                            .lt(Expr::col(Scholarship::ScholarshipEndsAt)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_scholarship_student")
                            .from(Scholarship::Table, Scholarship::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Scholarship::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Scholarship { Table, Id, StudentId, ScholarshipStartsAt, ScholarshipEndsAt, CreatedAt }

#[derive(DeriveIden)]
enum Student { Table, Id }
