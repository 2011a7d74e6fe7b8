use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{CreateScholarshipInput, Scholarship, ScholarshipResponse, ScholarshipWindow};
use super::repository::ScholarshipRepository;
use crate::errors::ServiceError;

pub struct ScholarshipService {
    repo: Arc<dyn ScholarshipRepository>,
}

impl ScholarshipService {
    pub fn new(repo: Arc<dyn ScholarshipRepository>) -> Self { Self { repo } }

    /// Date-ordering rule shared with student creation.
    pub fn validate_window(&self, window: &ScholarshipWindow) -> Result<(), ServiceError> {
        models::scholarship::validate_window(window.scholarship_starts_at, window.scholarship_ends_at)?;
        Ok(())
    }

    #[instrument(skip(self, input), fields(student_id = input.student_id))]
    pub async fn create(&self, input: CreateScholarshipInput) -> Result<Scholarship, ServiceError> {
        self.validate_window(&input.window)?;
        let created = self
            .repo
            .insert(input.student_id, input.window)
            .await
            .map_err(|e| e.on_constraint(|_| "Scholarship already registered for student".into(), "Student not found"))?;
        info!(scholarship_id = created.id, "scholarship_created");
        Ok(created)
    }

    pub async fn find_all(&self) -> Result<Vec<ScholarshipResponse>, ServiceError> {
        let rows = self.repo.list_with_student().await?;
        Ok(rows.into_iter().map(ScholarshipResponse::from).collect())
    }

    pub async fn find_one_by_id(&self, id: i32) -> Result<ScholarshipResponse, ServiceError> {
        self.repo
            .find_with_student(id)
            .await?
            .map(ScholarshipResponse::from)
            .ok_or_else(|| ServiceError::not_found("Scholarship"))
    }
}
