use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use models::errors::ModelError;
use models::{scholarship, student};

use super::domain::{Scholarship, ScholarshipWindow, ScholarshipWithStudent, StudentRef};
use crate::errors::ServiceError;

#[async_trait]
pub trait ScholarshipRepository: Send + Sync {
    async fn insert(&self, student_id: i32, window: ScholarshipWindow) -> Result<Scholarship, ServiceError>;
    async fn find_with_student(&self, id: i32) -> Result<Option<ScholarshipWithStudent>, ServiceError>;
    async fn list_with_student(&self) -> Result<Vec<ScholarshipWithStudent>, ServiceError>;
}

pub struct SeaOrmScholarshipRepository {
    pub db: DatabaseConnection,
}

fn joined((s, owner): (scholarship::Model, Option<student::Model>)) -> ScholarshipWithStudent {
    ScholarshipWithStudent { scholarship: s.into(), student: owner.map(StudentRef::from) }
}

#[async_trait]
impl ScholarshipRepository for SeaOrmScholarshipRepository {
    async fn insert(&self, student_id: i32, window: ScholarshipWindow) -> Result<Scholarship, ServiceError> {
        let created = scholarship::create(
            &self.db,
            student_id,
            window.scholarship_starts_at,
            window.scholarship_ends_at,
        )
        .await?;
        Ok(created.into())
    }

    async fn find_with_student(&self, id: i32) -> Result<Option<ScholarshipWithStudent>, ServiceError> {
        let found = scholarship::Entity::find_by_id(id)
            .find_also_related(student::Entity)
            .one(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(found.map(joined))
    }

    async fn list_with_student(&self) -> Result<Vec<ScholarshipWithStudent>, ServiceError> {
        let rows = scholarship::Entity::find()
            .find_also_related(student::Entity)
            .order_by_asc(scholarship::Column::Id)
            .all(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(rows.into_iter().map(joined).collect())
    }
}
