use std::sync::Arc;

use tracing::{info, instrument};

use models::advisor::{validate_name, validate_tax_id};

use super::domain::{Advisor, CreateAdvisorInput};
use super::repository::AdvisorRepository;
use crate::errors::ServiceError;

pub struct AdvisorService {
    repo: Arc<dyn AdvisorRepository>,
}

impl AdvisorService {
    pub fn new(repo: Arc<dyn AdvisorRepository>) -> Self { Self { repo } }

    #[instrument(skip(self, input), fields(tax_id = %input.tax_id))]
    pub async fn create(&self, input: CreateAdvisorInput) -> Result<Advisor, ServiceError> {
        validate_name(&input.name)?;
        validate_tax_id(&input.tax_id)?;
        let created = self
            .repo
            .insert(&input)
            .await
            .map_err(|e| e.on_constraint(|_| "Tax ID already registered".into(), "Advisor not found"))?;
        info!(advisor_id = created.id, "advisor_created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<Advisor>, ServiceError> { self.repo.list().await }

    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::advisor::{service::AdvisorService, domain::CreateAdvisorInput};
    /// use service::mock::InMemoryStore;
    /// let svc = AdvisorService::new(Arc::new(InMemoryStore::default()));
    /// let created = tokio_test::block_on(svc.create(CreateAdvisorInput { name: "Ada".into(), tax_id: "111".into() })).unwrap();
    /// let found = tokio_test::block_on(svc.find_one_by_id(created.id)).unwrap();
    /// assert_eq!(found.tax_id, "111");
    /// assert!(tokio_test::block_on(svc.find_one_by_id(999)).is_err());
    /// ```
    pub async fn find_one_by_id(&self, id: i32) -> Result<Advisor, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("Advisor"))
    }
}
