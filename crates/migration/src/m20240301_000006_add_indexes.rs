use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Student: lookups by advisor and by course
        manager
            .create_index(
                Index::create()
                    .name("idx_student_advisor")
                    .table(Student::Table)
                    .col(Student::AdvisorId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_student_course")
                    .table(Student::Table)
                    .col(Student::Course)
                    .to_owned(),
            )
            .await?;

        // Article: index on student_id
        manager
            .create_index(
                Index::create()
                    .name("idx_article_student")
                    .table(Article::Table)
                    .col(Article::StudentId)
                    .to_owned(),
            )
            .await?;

        // Recovery tokens are looked up by email when issuing new ones
        manager
            .create_index(
                Index::create()
                    .name("idx_recovery_email")
                    .table(PasswordRecoveryToken::Table)
                    .col(PasswordRecoveryToken::Email)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_student_advisor").table(Student::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_student_course").table(Student::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_article_student").table(Article::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_recovery_email")
                    .table(PasswordRecoveryToken::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Student { Table, AdvisorId, Course }

#[derive(DeriveIden)]
enum Article { Table, StudentId }

#[derive(DeriveIden)]
enum PasswordRecoveryToken { Table, Email }
