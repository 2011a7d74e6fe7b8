use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use models::advisor;
use models::errors::ModelError;

use super::domain::{Advisor, CreateAdvisorInput};
use crate::errors::ServiceError;

#[async_trait]
pub trait AdvisorRepository: Send + Sync {
    async fn insert(&self, input: &CreateAdvisorInput) -> Result<Advisor, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Advisor>, ServiceError>;
    async fn list(&self) -> Result<Vec<Advisor>, ServiceError>;
}

pub struct SeaOrmAdvisorRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl AdvisorRepository for SeaOrmAdvisorRepository {
    async fn insert(&self, input: &CreateAdvisorInput) -> Result<Advisor, ServiceError> {
        let created = advisor::create(&self.db, &input.name, &input.tax_id).await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Advisor>, ServiceError> {
        let found = advisor::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(found.map(Advisor::from))
    }

    async fn list(&self) -> Result<Vec<Advisor>, ServiceError> {
        let rows = advisor::Entity::find()
            .order_by_asc(advisor::Column::Id)
            .all(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(rows.into_iter().map(Advisor::from).collect())
    }
}
