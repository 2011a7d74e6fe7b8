use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use models::article;
use models::errors::ModelError;

use super::domain::{Article, CreateArticleInput};
use crate::errors::ServiceError;

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn insert(&self, input: &CreateArticleInput) -> Result<Article, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError>;
    async fn list(&self) -> Result<Vec<Article>, ServiceError>;
    async fn list_by_student(&self, student_id: i32) -> Result<Vec<Article>, ServiceError>;
    /// Returns false when no row was removed.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

pub struct SeaOrmArticleRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl ArticleRepository for SeaOrmArticleRepository {
    async fn insert(&self, input: &CreateArticleInput) -> Result<Article, ServiceError> {
        let created = article::create(
            &self.db,
            input.student_id,
            &input.title,
            input.summary.as_deref(),
            input.published_at,
        )
        .await?;
        Ok(created.into())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        let found = article::Entity::find_by_id(id).one(&self.db).await.map_err(ModelError::from_db)?;
        Ok(found.map(Article::from))
    }

    async fn list(&self) -> Result<Vec<Article>, ServiceError> {
        let rows = article::Entity::find()
            .order_by_asc(article::Column::Id)
            .all(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn list_by_student(&self, student_id: i32) -> Result<Vec<Article>, ServiceError> {
        let rows = article::Entity::find()
            .filter(article::Column::StudentId.eq(student_id))
            .order_by_asc(article::Column::Id)
            .all(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(rows.into_iter().map(Article::from).collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = article::Entity::delete_by_id(id).exec(&self.db).await.map_err(ModelError::from_db)?;
        Ok(res.rows_affected > 0)
    }
}
