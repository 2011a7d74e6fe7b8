use async_trait::async_trait;

use super::domain::{NewStudent, StudentChanges, StudentFilter, StudentProfile, StudentRecord};
use crate::errors::ServiceError;
use crate::scholarship::domain::ScholarshipWindow;

/// Persistence for students. Profiles come back ordered by id.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, ServiceError>;
    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<StudentRecord>, ServiceError>;
    async fn find_by_enrollment_number(&self, enrollment_number: &str) -> Result<Option<StudentRecord>, ServiceError>;

    async fn find_profiles(&self, filter: StudentFilter) -> Result<Vec<StudentProfile>, ServiceError>;
    /// One page of profiles plus the total row count.
    async fn page_profiles(&self, page_idx: u64, per_page: u64) -> Result<(Vec<StudentProfile>, u64), ServiceError>;

    /// Insert the student and its scholarship atomically.
    async fn insert_with_scholarship(&self, student: NewStudent, window: ScholarshipWindow) -> Result<StudentProfile, ServiceError>;
    async fn update_by_tax_id(&self, tax_id: &str, changes: StudentChanges) -> Result<Option<StudentRecord>, ServiceError>;
    /// Returns false when no student has `email`.
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, ServiceError>;
}
