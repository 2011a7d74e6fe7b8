use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Article, CreateArticleInput};
use super::repository::ArticleRepository;
use crate::errors::ServiceError;

pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(student_id = input.student_id))]
    pub async fn create(&self, input: CreateArticleInput) -> Result<Article, ServiceError> {
        models::article::validate_title(&input.title)?;
        let created = self
            .repo
            .insert(&input)
            .await
            .map_err(|e| e.on_constraint(|raw| raw.to_string(), "Student not found"))?;
        info!(article_id = created.id, "article_created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<Article>, ServiceError> { self.repo.list().await }

    pub async fn find_one_by_id(&self, id: i32) -> Result<Article, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Article"))
    }

    pub async fn find_by_student(&self, student_id: i32) -> Result<Vec<Article>, ServiceError> {
        self.repo.list_by_student(student_id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("Article"));
        }
        info!("article_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{fixtures, InMemoryStore};

    fn input(student_id: i32, title: &str) -> CreateArticleInput {
        CreateArticleInput { student_id, title: title.into(), summary: None, published_at: None }
    }

    #[tokio::test]
    async fn create_list_and_delete() {
        let store = Arc::new(InMemoryStore::default());
        let owner = fixtures::seed_student(&store, "art@example.com", "Physics").await;
        let svc = ArticleService::new(store.clone());

        let a = svc.create(input(owner.id, "Lattice models")).await.unwrap();
        svc.create(input(owner.id, "Spin glasses")).await.unwrap();

        assert_eq!(svc.find_by_student(owner.id).await.unwrap().len(), 2);
        assert_eq!(svc.find_one_by_id(a.id).await.unwrap().title, "Lattice models");

        svc.delete(a.id).await.unwrap();
        assert_eq!(svc.find_all().await.unwrap().len(), 1);
        assert!(matches!(svc.delete(a.id).await, Err(ServiceError::NotFound(m)) if m == "Article not found"));
    }

    #[tokio::test]
    async fn unknown_student_and_blank_title_are_rejected() {
        let svc = ArticleService::new(Arc::new(InMemoryStore::default()));
        assert!(matches!(svc.create(input(5, "Orphan")).await, Err(ServiceError::NotFound(m)) if m == "Student not found"));
        assert!(svc.create(input(5, "   ")).await.unwrap_err().is_client_error());
    }
}
