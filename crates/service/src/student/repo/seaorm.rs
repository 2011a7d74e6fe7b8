use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use tracing::debug;

use models::errors::ModelError;
use models::{article, scholarship, student};

use crate::errors::ServiceError;
use crate::scholarship::domain::ScholarshipWindow;
use crate::student::domain::{NewStudent, StudentChanges, StudentFilter, StudentProfile, StudentRecord};
use crate::student::repository::StudentRepository;

pub struct SeaOrmStudentRepository {
    pub db: DatabaseConnection,
}

/// Escape LIKE wildcards so user input only matches literally.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl SeaOrmStudentRepository {
    async fn find_one_by(&self, col: student::Column, value: &str) -> Result<Option<StudentRecord>, ServiceError> {
        let found = student::Entity::find()
            .filter(col.eq(value))
            .one(&self.db)
            .await
            .map_err(ModelError::from_db)?;
        Ok(found.map(StudentRecord::from))
    }

    /// Attach articles and scholarship to each row, two queries regardless of row count.
    async fn load_profiles(&self, rows: Vec<student::Model>) -> Result<Vec<StudentProfile>, ServiceError> {
        let articles = rows.load_many(article::Entity, &self.db).await.map_err(ModelError::from_db)?;
        let scholarships = rows.load_one(scholarship::Entity, &self.db).await.map_err(ModelError::from_db)?;
        Ok(rows
            .into_iter()
            .zip(articles)
            .zip(scholarships)
            .map(|((s, arts), sch)| StudentProfile {
                student: s.into(),
                articles: arts.into_iter().map(Into::into).collect(),
                scholarship: sch.map(Into::into),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl StudentRepository for SeaOrmStudentRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, ServiceError> {
        self.find_one_by(student::Column::Email, email).await
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<StudentRecord>, ServiceError> {
        self.find_one_by(student::Column::TaxId, tax_id).await
    }

    async fn find_by_enrollment_number(&self, enrollment_number: &str) -> Result<Option<StudentRecord>, ServiceError> {
        self.find_one_by(student::Column::EnrollmentNumber, enrollment_number).await
    }

    async fn find_profiles(&self, filter: StudentFilter) -> Result<Vec<StudentProfile>, ServiceError> {
        let query = student::Entity::find().order_by_asc(student::Column::Id);
        let query = match filter {
            StudentFilter::All => query,
            StudentFilter::Id(id) => query.filter(student::Column::Id.eq(id)),
            StudentFilter::Email(email) => query.filter(student::Column::Email.eq(email)),
            StudentFilter::Advisor(advisor_id) => query.filter(student::Column::AdvisorId.eq(advisor_id)),
            StudentFilter::CourseContains(course) => query.filter(
                Expr::expr(Func::lower(Expr::col(student::Column::Course))).like(like_pattern(&course)),
            ),
        };
        let rows = query.all(&self.db).await.map_err(ModelError::from_db)?;
        self.load_profiles(rows).await
    }

    async fn page_profiles(&self, page_idx: u64, per_page: u64) -> Result<(Vec<StudentProfile>, u64), ServiceError> {
        let paginator = student::Entity::find()
            .order_by_asc(student::Column::Id)
            .paginate(&self.db, per_page);
        let total = paginator.num_items().await.map_err(ModelError::from_db)?;
        let rows = paginator.fetch_page(page_idx).await.map_err(ModelError::from_db)?;
        Ok((self.load_profiles(rows).await?, total))
    }

    async fn insert_with_scholarship(&self, new: NewStudent, window: ScholarshipWindow) -> Result<StudentProfile, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db)?;
        let created = student::create(&txn, &new).await?;
        let sch = scholarship::create(&txn, created.id, window.scholarship_starts_at, window.scholarship_ends_at).await?;
        txn.commit().await.map_err(ServiceError::db)?;
        debug!(student_id = created.id, scholarship_id = sch.id, "student_and_scholarship_committed");
        Ok(StudentProfile { student: created.into(), articles: Vec::new(), scholarship: Some(sch.into()) })
    }

    async fn update_by_tax_id(&self, tax_id: &str, changes: StudentChanges) -> Result<Option<StudentRecord>, ServiceError> {
        let updated = student::update_by_tax_id(&self.db, tax_id, &changes).await?;
        Ok(updated.map(StudentRecord::from))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, ServiceError> {
        Ok(student::update_password_by_email(&self.db, email, password_hash).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ENG"), "%eng%");
        assert_eq!(like_pattern("100%_x"), "%100\\%\\_x%");
    }

    fn window() -> ScholarshipWindow {
        ScholarshipWindow {
            scholarship_starts_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            scholarship_ends_at: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        }
    }

    #[tokio::test]
    async fn transactional_insert_and_course_filter() {
        let Some(db) = get_db().await else { return };
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let adv = models::advisor::create(&db, "Adv", &format!("adv-{}", &suffix[..20])).await.unwrap();
        let repo = SeaOrmStudentRepository { db: db.clone() };

        let new = NewStudent {
            name: "Repo".into(),
            email: format!("repo-{suffix}@example.com"),
            tax_id: format!("tx-{}", &suffix[..20]),
            enrollment_number: format!("en-{suffix}"),
            course: format!("Electrical ENGINEERING {suffix}"),
            password_hash: "hash".into(),
            advisor_id: adv.id,
        };
        let profile = repo.insert_with_scholarship(new.clone(), window()).await.unwrap();
        assert_eq!(profile.scholarship.as_ref().map(|s| s.student_id), Some(profile.student.id));

        let found = repo
            .find_profiles(StudentFilter::CourseContains(format!("engineering {suffix}")))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].scholarship.is_some());

        // same email again: nothing from the second attempt survives
        let mut dup = new.clone();
        dup.tax_id = format!("ty-{}", &suffix[..20]);
        dup.enrollment_number = format!("eo-{suffix}");
        let err = repo.insert_with_scholarship(dup.clone(), window()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Model(ModelError::Duplicate(_))));
        assert!(repo.find_by_tax_id(&dup.tax_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn paging_reports_totals() {
        let Some(db) = get_db().await else { return };
        let repo = SeaOrmStudentRepository { db };
        let (rows, total) = repo.page_profiles(0, 5).await.unwrap();
        assert!(rows.len() as u64 <= total.min(5));
    }
}
