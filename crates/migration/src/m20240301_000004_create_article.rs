//! Create `article` table, many per student.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Article::Table)
                    .if_not_exists()
                    .col(pk_auto(Article::Id))
                    .col(integer(Article::StudentId).not_null())
                    .col(string_len(Article::Title, 255).not_null())
                    .col(ColumnDef::new(Article::Summary).text().null())
                    .col(ColumnDef::new(Article::PublishedAt).date().null())
                    .col(timestamp_with_time_zone(Article::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_article_student")
                            .from(Article::Table, Article::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Article::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Article { Table, Id, StudentId, Title, Summary, PublishedAt, CreatedAt }

#[derive(DeriveIden)]
enum Student { Table, Id }
