//! Create `student` table with FK to `advisor`.
//!
//! email, tax_id and enrollment_number are unique so concurrent registrations
//! cannot both commit the same identity.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(pk_auto(Student::Id))
                    .col(string_len(Student::Name, 128).not_null())
                    .col(string_len(Student::Email, 255).unique_key().not_null())
                    .col(string_len(Student::TaxId, 32).unique_key().not_null())
                    .col(string_len(Student::EnrollmentNumber, 64).unique_key().not_null())
                    .col(string_len(Student::Course, 128).not_null())
                    .col(string_len(Student::Password, 255).not_null())
                    .col(integer(Student::AdvisorId).not_null())
                    .col(timestamp_with_time_zone(Student::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Student::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_student_advisor")
                            .from(Student::Table, Student::AdvisorId)
                            .to(Advisor::Table, Advisor::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Student::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Student {
    Table,
    Id,
    Name,
    Email,
    TaxId,
    EnrollmentNumber,
    Course,
    Password,
    AdvisorId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Advisor { Table, Id }
