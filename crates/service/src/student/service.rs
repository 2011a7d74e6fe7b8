use std::sync::Arc;

use tracing::{info, instrument, warn};

use common::crypto::hash_password;
use models::student::{validate_email, validate_name, validate_password, validate_required};

use super::domain::{
    describe_duplicate, CreateStudentInput, NewStudent, StudentChanges, StudentFilter, StudentResponse,
    UpdatePasswordInput, UpdateStudentInput,
};
use super::repository::StudentRepository;
use crate::advisor::service::AdvisorService;
use crate::errors::ServiceError;
use crate::pagination::{Page, Pagination};
use crate::scholarship::service::ScholarshipService;

pub struct StudentService {
    repo: Arc<dyn StudentRepository>,
    advisors: Arc<AdvisorService>,
    scholarships: Arc<ScholarshipService>,
}

fn validate_create(input: &CreateStudentInput) -> Result<(), ServiceError> {
    validate_name(&input.name)?;
    validate_email(&input.email)?;
    validate_required("tax_id", &input.tax_id)?;
    validate_required("enrollment_number", &input.enrollment_number)?;
    validate_required("course", &input.course)?;
    validate_password(&input.password)?;
    Ok(())
}

impl StudentService {
    pub fn new(
        repo: Arc<dyn StudentRepository>,
        advisors: Arc<AdvisorService>,
        scholarships: Arc<ScholarshipService>,
    ) -> Self {
        Self { repo, advisors, scholarships }
    }

    /// Register a student together with its scholarship.
    ///
    /// Checks run in a fixed order and the first failure wins; nothing is written
    /// unless every check passes.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::NaiveDate;
    /// use service::registry::{Repositories, Services, ServicesConfig};
    /// use service::advisor::domain::CreateAdvisorInput;
    /// use service::student::domain::CreateStudentInput;
    /// use service::scholarship::domain::ScholarshipWindow;
    /// use service::mock::{InMemoryStore, CapturingNotifier};
    ///
    /// let repos = Repositories::in_memory(Arc::new(InMemoryStore::default()), Arc::new(CapturingNotifier::default()));
    /// let svc = Services::new(repos, ServicesConfig::default());
    /// let advisor = tokio_test::block_on(svc.advisors.create(CreateAdvisorInput { name: "Ada".into(), tax_id: "A1".into() })).unwrap();
    /// let created = tokio_test::block_on(svc.students.create_student(CreateStudentInput {
    ///     name: "Lin".into(), email: "lin@example.com".into(), tax_id: "S1".into(),
    ///     enrollment_number: "E1".into(), course: "Mathematics".into(), password: "password123".into(),
    ///     advisor_id: advisor.id,
    ///     scholarship: ScholarshipWindow {
    ///         scholarship_starts_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///         scholarship_ends_at: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    ///     },
    /// })).unwrap();
    /// assert_eq!(created.scholarship.unwrap().student_id, created.id);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, advisor_id = input.advisor_id))]
    pub async fn create_student(&self, input: CreateStudentInput) -> Result<StudentResponse, ServiceError> {
        validate_create(&input)?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Validation("Email already registered".into()));
        }

        let advisor = self.advisors.find_one_by_id(input.advisor_id).await?;
        if advisor.tax_id == input.tax_id {
            return Err(ServiceError::Validation("Tax ID matches the advisor's tax ID".into()));
        }

        if self.repo.find_by_tax_id(&input.tax_id).await?.is_some() {
            return Err(ServiceError::Validation("Tax ID already registered".into()));
        }
        if self.repo.find_by_enrollment_number(&input.enrollment_number).await?.is_some() {
            return Err(ServiceError::Validation("Enrollment Number already registered".into()));
        }

        self.scholarships.validate_window(&input.scholarship)?;

        let password_hash = hash_password(&input.password)?;
        let new = NewStudent {
            name: input.name,
            email: input.email,
            tax_id: input.tax_id,
            enrollment_number: input.enrollment_number,
            course: input.course,
            password_hash,
            advisor_id: input.advisor_id,
        };
        let profile = self
            .repo
            .insert_with_scholarship(new, input.scholarship)
            .await
            .map_err(|e| e.on_constraint(describe_duplicate, "Advisor not found"))?;
        info!(student_id = profile.student.id, "student_created");
        Ok(profile.into())
    }

    pub async fn find_all_students(&self) -> Result<Vec<StudentResponse>, ServiceError> {
        self.find_where(StudentFilter::All).await
    }

    pub async fn find_all_students_paginated(&self, pagination: Pagination) -> Result<Page<StudentResponse>, ServiceError> {
        let (page_idx, per_page) = pagination.normalize();
        let (rows, total) = self.repo.page_profiles(page_idx, per_page).await?;
        Ok(Page::new(rows, total, per_page, page_idx).map(StudentResponse::from))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<StudentResponse, ServiceError> {
        self.find_single(StudentFilter::Id(id)).await
    }

    pub async fn find_by_course(&self, course: &str) -> Result<Vec<StudentResponse>, ServiceError> {
        self.find_where(StudentFilter::CourseContains(course.to_string())).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<StudentResponse, ServiceError> {
        self.find_single(StudentFilter::Email(email.to_string())).await
    }

    pub async fn find_by_advisor_id(&self, advisor_id: i32) -> Result<Vec<StudentResponse>, ServiceError> {
        self.find_where(StudentFilter::Advisor(advisor_id)).await
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn update_password(&self, input: UpdatePasswordInput) -> Result<(), ServiceError> {
        validate_password(&input.password)?;
        let hash = hash_password(&input.password)?;
        if !self.repo.update_password(&input.email, &hash).await? {
            warn!("password update for unknown email");
            return Err(ServiceError::not_found("Student"));
        }
        info!("student_password_updated");
        Ok(())
    }

    #[instrument(skip(self, input), fields(tax_id = %input.tax_id))]
    pub async fn update_student(&self, input: UpdateStudentInput) -> Result<StudentResponse, ServiceError> {
        if let Some(p) = &input.password {
            validate_password(p)?;
        }
        if let Some(advisor_id) = input.advisor_id {
            let advisor = self.advisors.find_one_by_id(advisor_id).await?;
            if advisor.tax_id == input.tax_id {
                return Err(ServiceError::Validation("Tax ID matches the advisor's tax ID".into()));
            }
        }
        let password_hash = input.password.as_deref().map(hash_password).transpose()?;
        let changes = StudentChanges {
            name: input.name,
            email: input.email,
            enrollment_number: input.enrollment_number,
            course: input.course,
            password_hash,
            advisor_id: input.advisor_id,
        };
        let updated = self
            .repo
            .update_by_tax_id(&input.tax_id, changes)
            .await
            .map_err(|e| e.on_constraint(describe_duplicate, "Advisor not found"))?
            .ok_or_else(|| ServiceError::not_found("Student"))?;
        info!(student_id = updated.id, "student_updated");
        self.find_by_id(updated.id).await
    }

    async fn find_where(&self, filter: StudentFilter) -> Result<Vec<StudentResponse>, ServiceError> {
        let rows = self.repo.find_profiles(filter).await?;
        Ok(rows.into_iter().map(StudentResponse::from).collect())
    }

    async fn find_single(&self, filter: StudentFilter) -> Result<StudentResponse, ServiceError> {
        self.find_where(filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::not_found("Student"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::domain::CreateAdvisorInput;
    use crate::mock::InMemoryStore;
    use crate::scholarship::domain::ScholarshipWindow;
    use chrono::NaiveDate;
    use common::crypto::verify_password;

    struct Fixture {
        store: Arc<InMemoryStore>,
        svc: StudentService,
        advisor_id: i32,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::default());
        let advisors = Arc::new(AdvisorService::new(store.clone()));
        let scholarships = Arc::new(ScholarshipService::new(store.clone()));
        let advisor = advisors
            .create(CreateAdvisorInput { name: "Dr. Ada".into(), tax_id: "ADV-1".into() })
            .await
            .unwrap();
        let svc = StudentService::new(store.clone(), advisors, scholarships);
        Fixture { store, svc, advisor_id: advisor.id }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, day).unwrap() }

    fn input(advisor_id: i32, n: u32, course: &str) -> CreateStudentInput {
        CreateStudentInput {
            name: format!("Student {n}"),
            email: format!("s{n}@example.com"),
            tax_id: format!("TAX-{n}"),
            enrollment_number: format!("ENR-{n}"),
            course: course.into(),
            password: "password123".into(),
            advisor_id,
            scholarship: ScholarshipWindow { scholarship_starts_at: d(2024, 1, 1), scholarship_ends_at: d(2024, 12, 31) },
        }
    }

    fn validation_message(err: ServiceError) -> String {
        match err {
            ServiceError::Validation(m) => m,
            ServiceError::Model(models::errors::ModelError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_payload_creates_student_and_linked_scholarship() {
        let f = fixture().await;
        let created = f.svc.create_student(input(f.advisor_id, 1, "Mathematics")).await.unwrap();
        assert_eq!(created.scholarship.as_ref().unwrap().student_id, created.id);
        assert_eq!(f.store.student_count().await, 1);
        assert_eq!(f.store.scholarship_count().await, 1);

        let json = serde_json::to_value(&created).unwrap();
        assert!(json.get("password").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_fails_without_writing() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        let mut again = input(f.advisor_id, 2, "Math");
        again.email = "s1@example.com".into();
        let err = f.svc.create_student(again).await.unwrap_err();
        assert_eq!(validation_message(err), "Email already registered");
        assert_eq!(f.store.student_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_advisor_propagates_not_found() {
        let f = fixture().await;
        let err = f.svc.create_student(input(f.advisor_id + 100, 1, "Math")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Advisor not found"));
    }

    #[tokio::test]
    async fn advisor_tax_id_is_rejected_before_any_write() {
        let f = fixture().await;
        let mut i = input(f.advisor_id, 1, "Math");
        i.tax_id = "ADV-1".into();
        let err = f.svc.create_student(i).await.unwrap_err();
        assert_eq!(validation_message(err), "Tax ID matches the advisor's tax ID");
        assert_eq!(f.store.student_count().await, 0);
    }

    #[tokio::test]
    async fn duplicate_tax_id_and_enrollment_number_are_rejected() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();

        let mut same_tax = input(f.advisor_id, 2, "Math");
        same_tax.tax_id = "TAX-1".into();
        assert_eq!(validation_message(f.svc.create_student(same_tax).await.unwrap_err()), "Tax ID already registered");

        let mut same_enr = input(f.advisor_id, 3, "Math");
        same_enr.enrollment_number = "ENR-1".into();
        assert_eq!(
            validation_message(f.svc.create_student(same_enr).await.unwrap_err()),
            "Enrollment Number already registered"
        );
    }

    #[tokio::test]
    async fn inverted_window_persists_nothing() {
        let f = fixture().await;
        let mut i = input(f.advisor_id, 1, "Math");
        i.scholarship.scholarship_ends_at = i.scholarship.scholarship_starts_at;
        let err = f.svc.create_student(i).await.unwrap_err();
        assert_eq!(validation_message(err), "Scholarship start date must be before the end date");
        assert_eq!(f.store.student_count().await, 0);
        assert_eq!(f.store.scholarship_count().await, 0);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let f = fixture().await;
        let mut i = input(f.advisor_id, 1, "Math");
        i.password = "short".into();
        assert!(f.svc.create_student(i).await.unwrap_err().is_client_error());
    }

    #[tokio::test]
    async fn course_search_is_case_insensitive_substring() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Software Engineering")).await.unwrap();
        f.svc.create_student(input(f.advisor_id, 2, "ENGLISH Literature")).await.unwrap();
        f.svc.create_student(input(f.advisor_id, 3, "Biology")).await.unwrap();

        let found = f.svc.find_by_course("eng").await.unwrap();
        let emails: Vec<_> = found.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(emails, vec!["s1@example.com", "s2@example.com"]);
        assert!(f.svc.find_by_course("chemistry").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookups_by_id_email_and_advisor() {
        let f = fixture().await;
        let a = f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        assert_eq!(f.svc.find_by_id(a.id).await.unwrap().email, "s1@example.com");
        assert_eq!(f.svc.find_by_email("s1@example.com").await.unwrap().id, a.id);
        assert_eq!(f.svc.find_by_advisor_id(f.advisor_id).await.unwrap().len(), 1);
        assert!(f.svc.find_by_advisor_id(f.advisor_id + 1).await.unwrap().is_empty());
        assert!(matches!(f.svc.find_by_id(a.id + 50).await, Err(ServiceError::NotFound(m)) if m == "Student not found"));
        assert!(matches!(f.svc.find_by_email("nobody@example.com").await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn pagination_meta_matches_totals() {
        let f = fixture().await;
        for n in 1..=5 {
            f.svc.create_student(input(f.advisor_id, n, "Math")).await.unwrap();
        }
        let page = f.svc.find_all_students_paginated(Pagination { page: 3, per_page: 2 }).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total_items, 5);
        assert_eq!(page.meta.item_count, 1);
        assert_eq!(page.meta.items_per_page, 2);
        assert_eq!(page.meta.total_pages, 3);
        assert_eq!(page.meta.current_page, 3);
        assert_eq!(page.items[0].email, "s5@example.com");
        assert_eq!(f.svc.find_all_students().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn update_rehashes_only_when_password_given() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        let before = f.store.password_hash("s1@example.com").await.unwrap();

        let renamed = f
            .svc
            .update_student(UpdateStudentInput { tax_id: "TAX-1".into(), name: Some("Renamed".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(renamed.name, "Renamed");
        assert_eq!(renamed.course, "Math");
        assert_eq!(f.store.password_hash("s1@example.com").await.unwrap(), before);

        f.svc
            .update_student(UpdateStudentInput {
                tax_id: "TAX-1".into(),
                password: Some("another-secret".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let after = f.store.password_hash("s1@example.com").await.unwrap();
        assert_ne!(after, before);
        assert!(verify_password("another-secret", &after).unwrap());
    }

    #[tokio::test]
    async fn update_collisions_and_missing_rows() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        f.svc.create_student(input(f.advisor_id, 2, "Math")).await.unwrap();

        let err = f
            .svc
            .update_student(UpdateStudentInput { tax_id: "TAX-2".into(), email: Some("s1@example.com".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), "Email already registered");

        let err = f
            .svc
            .update_student(UpdateStudentInput { tax_id: "NOPE".into(), name: Some("x".into()), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Student not found"));
    }

    #[tokio::test]
    async fn update_cannot_assign_advisor_sharing_the_students_tax_id() {
        let f = fixture().await;
        let created = f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        let twin = f
            .svc
            .advisors
            .create(CreateAdvisorInput { name: "Dr. Twin".into(), tax_id: "TAX-1".into() })
            .await
            .unwrap();

        let err = f
            .svc
            .update_student(UpdateStudentInput { tax_id: "TAX-1".into(), advisor_id: Some(twin.id), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), "Tax ID matches the advisor's tax ID");
        assert_eq!(f.svc.find_by_id(created.id).await.unwrap().advisor_id, f.advisor_id);

        let err = f
            .svc
            .update_student(UpdateStudentInput { tax_id: "TAX-1".into(), advisor_id: Some(twin.id + 50), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(m) if m == "Advisor not found"));
    }

    #[tokio::test]
    async fn update_password_by_email() {
        let f = fixture().await;
        f.svc.create_student(input(f.advisor_id, 1, "Math")).await.unwrap();
        f.svc
            .update_password(UpdatePasswordInput { email: "s1@example.com".into(), password: "brand-new-pass".into() })
            .await
            .unwrap();
        let hash = f.store.password_hash("s1@example.com").await.unwrap();
        assert!(verify_password("brand-new-pass", &hash).unwrap());

        let err = f
            .svc
            .update_password(UpdatePasswordInput { email: "ghost@example.com".into(), password: "brand-new-pass".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
