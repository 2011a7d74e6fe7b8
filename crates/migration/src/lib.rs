//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_advisor;
mod m20240301_000002_create_student;
mod m20240301_000003_create_scholarship;
mod m20240301_000004_create_article;
mod m20240301_000005_create_password_recovery_token;
mod m20240301_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_advisor::Migration),
            Box::new(m20240301_000002_create_student::Migration),
            Box::new(m20240301_000003_create_scholarship::Migration),
            Box::new(m20240301_000004_create_article::Migration),
            Box::new(m20240301_000005_create_password_recovery_token::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000006_add_indexes::Migration),
        ]
    }
}
