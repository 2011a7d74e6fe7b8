//! In-memory stand-ins for every repository trait plus a capturing notifier.
//!
//! The store reproduces the storage constraints (unique columns, foreign keys,
//! one scholarship per student) and reports violations with the same
//! `ModelError` variants and constraint names PostgreSQL produces, so services
//! behave identically on either backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use models::errors::ModelError;

use crate::advisor::domain::{Advisor, CreateAdvisorInput};
use crate::advisor::repository::AdvisorRepository;
use crate::article::domain::{Article, CreateArticleInput};
use crate::article::repository::ArticleRepository;
use crate::errors::ServiceError;
use crate::password_recovery::domain::RecoveryToken;
use crate::password_recovery::notifier::RecoveryNotifier;
use crate::password_recovery::repository::RecoveryTokenRepository;
use crate::scholarship::domain::{Scholarship, ScholarshipWindow, ScholarshipWithStudent, StudentRef};
use crate::scholarship::repository::ScholarshipRepository;
use crate::student::domain::{NewStudent, StudentChanges, StudentFilter, StudentProfile, StudentRecord};
use crate::student::repository::StudentRepository;

fn duplicate(constraint: &str) -> ServiceError {
    ServiceError::Model(ModelError::Duplicate(format!(
        "duplicate key value violates unique constraint \"{constraint}\""
    )))
}

fn missing(constraint: &str) -> ServiceError {
    ServiceError::Model(ModelError::MissingReference(format!(
        "insert or update violates foreign key constraint \"{constraint}\""
    )))
}

#[derive(Default)]
struct State {
    seq: i32,
    advisors: Vec<Advisor>,
    students: Vec<StudentRecord>,
    scholarships: Vec<Scholarship>,
    articles: Vec<Article>,
    tokens: Vec<RecoveryToken>,
}

impl State {
    fn next_id(&mut self) -> i32 {
        self.seq += 1;
        self.seq
    }

    fn profile(&self, s: &StudentRecord) -> StudentProfile {
        StudentProfile {
            student: s.clone(),
            articles: self.articles.iter().filter(|a| a.student_id == s.id).cloned().collect(),
            scholarship: self.scholarships.iter().find(|x| x.student_id == s.id).cloned(),
        }
    }

    fn joined(&self, sch: &Scholarship) -> ScholarshipWithStudent {
        let student = self.students.iter().find(|s| s.id == sch.student_id).map(|s| StudentRef {
            id: s.id,
            name: s.name.clone(),
            email: s.email.clone(),
        });
        ScholarshipWithStudent { scholarship: sch.clone(), student }
    }

    fn student_exists(&self, id: i32) -> bool { self.students.iter().any(|s| s.id == id) }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub async fn student_count(&self) -> usize { self.state.lock().await.students.len() }

    pub async fn scholarship_count(&self) -> usize { self.state.lock().await.scholarships.len() }

    pub async fn password_hash(&self, email: &str) -> Option<String> {
        let st = self.state.lock().await;
        st.students.iter().find(|s| s.email == email).map(|s| s.password_hash.clone())
    }
}

#[async_trait]
impl AdvisorRepository for InMemoryStore {
    async fn insert(&self, input: &CreateAdvisorInput) -> Result<Advisor, ServiceError> {
        models::advisor::validate_name(&input.name)?;
        models::advisor::validate_tax_id(&input.tax_id)?;
        let mut st = self.state.lock().await;
        if st.advisors.iter().any(|a| a.tax_id == input.tax_id) {
            return Err(duplicate("advisor_tax_id_key"));
        }
        let advisor = Advisor { id: st.next_id(), name: input.name.trim().to_string(), tax_id: input.tax_id.clone() };
        st.advisors.push(advisor.clone());
        Ok(advisor)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Advisor>, ServiceError> {
        Ok(self.state.lock().await.advisors.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Advisor>, ServiceError> { Ok(self.state.lock().await.advisors.clone()) }
}

#[async_trait]
impl ScholarshipRepository for InMemoryStore {
    async fn insert(&self, student_id: i32, window: ScholarshipWindow) -> Result<Scholarship, ServiceError> {
        models::scholarship::validate_window(window.scholarship_starts_at, window.scholarship_ends_at)?;
        let mut st = self.state.lock().await;
        if !st.student_exists(student_id) {
            return Err(missing("fk_scholarship_student"));
        }
        if st.scholarships.iter().any(|s| s.student_id == student_id) {
            return Err(duplicate("scholarship_student_id_key"));
        }
        let sch = Scholarship {
            id: st.next_id(),
            student_id,
            scholarship_starts_at: window.scholarship_starts_at,
            scholarship_ends_at: window.scholarship_ends_at,
        };
        st.scholarships.push(sch.clone());
        Ok(sch)
    }

    async fn find_with_student(&self, id: i32) -> Result<Option<ScholarshipWithStudent>, ServiceError> {
        let st = self.state.lock().await;
        Ok(st.scholarships.iter().find(|s| s.id == id).map(|s| st.joined(s)))
    }

    async fn list_with_student(&self) -> Result<Vec<ScholarshipWithStudent>, ServiceError> {
        let st = self.state.lock().await;
        Ok(st.scholarships.iter().map(|s| st.joined(s)).collect())
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn insert(&self, input: &CreateArticleInput) -> Result<Article, ServiceError> {
        models::article::validate_title(&input.title)?;
        let mut st = self.state.lock().await;
        if !st.student_exists(input.student_id) {
            return Err(missing("fk_article_student"));
        }
        let article = Article {
            id: st.next_id(),
            student_id: input.student_id,
            title: input.title.trim().to_string(),
            summary: input.summary.clone(),
            published_at: input.published_at,
        };
        st.articles.push(article.clone());
        Ok(article)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Article>, ServiceError> {
        Ok(self.state.lock().await.articles.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Article>, ServiceError> { Ok(self.state.lock().await.articles.clone()) }

    async fn list_by_student(&self, student_id: i32) -> Result<Vec<Article>, ServiceError> {
        let st = self.state.lock().await;
        Ok(st.articles.iter().filter(|a| a.student_id == student_id).cloned().collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut st = self.state.lock().await;
        let before = st.articles.len();
        st.articles.retain(|a| a.id != id);
        Ok(st.articles.len() != before)
    }
}

#[async_trait]
impl StudentRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<StudentRecord>, ServiceError> {
        Ok(self.state.lock().await.students.iter().find(|s| s.email == email).cloned())
    }

    async fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<StudentRecord>, ServiceError> {
        Ok(self.state.lock().await.students.iter().find(|s| s.tax_id == tax_id).cloned())
    }

    async fn find_by_enrollment_number(&self, enrollment_number: &str) -> Result<Option<StudentRecord>, ServiceError> {
        let st = self.state.lock().await;
        Ok(st.students.iter().find(|s| s.enrollment_number == enrollment_number).cloned())
    }

    async fn find_profiles(&self, filter: StudentFilter) -> Result<Vec<StudentProfile>, ServiceError> {
        let st = self.state.lock().await;
        let keep = |s: &&StudentRecord| match &filter {
            StudentFilter::All => true,
            StudentFilter::Id(id) => s.id == *id,
            StudentFilter::Email(email) => &s.email == email,
            StudentFilter::Advisor(advisor_id) => s.advisor_id == *advisor_id,
            StudentFilter::CourseContains(c) => s.course.to_lowercase().contains(&c.to_lowercase()),
        };
        Ok(st.students.iter().filter(keep).map(|s| st.profile(s)).collect())
    }

    async fn page_profiles(&self, page_idx: u64, per_page: u64) -> Result<(Vec<StudentProfile>, u64), ServiceError> {
        let st = self.state.lock().await;
        let rows = st
            .students
            .iter()
            .skip((page_idx * per_page) as usize)
            .take(per_page as usize)
            .map(|s| st.profile(s))
            .collect();
        Ok((rows, st.students.len() as u64))
    }

    async fn insert_with_scholarship(&self, new: NewStudent, window: ScholarshipWindow) -> Result<StudentProfile, ServiceError> {
        models::student::validate_name(&new.name)?;
        models::student::validate_email(&new.email)?;
        models::student::validate_required("tax_id", &new.tax_id)?;
        models::student::validate_required("enrollment_number", &new.enrollment_number)?;
        models::student::validate_required("course", &new.course)?;
        models::scholarship::validate_window(window.scholarship_starts_at, window.scholarship_ends_at)?;

        // every check happens before the first write, which is what the transaction guarantees
        let mut st = self.state.lock().await;
        if st.students.iter().any(|s| s.email == new.email) {
            return Err(duplicate("student_email_key"));
        }
        if st.students.iter().any(|s| s.tax_id == new.tax_id) {
            return Err(duplicate("student_tax_id_key"));
        }
        if st.students.iter().any(|s| s.enrollment_number == new.enrollment_number) {
            return Err(duplicate("student_enrollment_number_key"));
        }
        if !st.advisors.iter().any(|a| a.id == new.advisor_id) {
            return Err(missing("fk_student_advisor"));
        }
        let student = StudentRecord {
            id: st.next_id(),
            name: new.name,
            email: new.email,
            tax_id: new.tax_id,
            enrollment_number: new.enrollment_number,
            course: new.course,
            password_hash: new.password_hash,
            advisor_id: new.advisor_id,
        };
        let sch = Scholarship {
            id: st.next_id(),
            student_id: student.id,
            scholarship_starts_at: window.scholarship_starts_at,
            scholarship_ends_at: window.scholarship_ends_at,
        };
        st.students.push(student.clone());
        st.scholarships.push(sch.clone());
        Ok(StudentProfile { student, articles: Vec::new(), scholarship: Some(sch) })
    }

    async fn update_by_tax_id(&self, tax_id: &str, changes: StudentChanges) -> Result<Option<StudentRecord>, ServiceError> {
        let mut st = self.state.lock().await;
        let Some(idx) = st.students.iter().position(|s| s.tax_id == tax_id) else { return Ok(None) };
        let id = st.students[idx].id;
        if let Some(email) = &changes.email {
            models::student::validate_email(email)?;
            if st.students.iter().any(|s| s.id != id && &s.email == email) {
                return Err(duplicate("student_email_key"));
            }
        }
        if let Some(enr) = &changes.enrollment_number {
            models::student::validate_required("enrollment_number", enr)?;
            if st.students.iter().any(|s| s.id != id && &s.enrollment_number == enr) {
                return Err(duplicate("student_enrollment_number_key"));
            }
        }
        if let Some(advisor_id) = changes.advisor_id {
            if !st.advisors.iter().any(|a| a.id == advisor_id) {
                return Err(missing("fk_student_advisor"));
            }
        }
        if let Some(name) = &changes.name {
            models::student::validate_name(name)?;
        }
        if let Some(course) = &changes.course {
            models::student::validate_required("course", course)?;
        }

        let s = &mut st.students[idx];
        if let Some(v) = changes.name { s.name = v; }
        if let Some(v) = changes.email { s.email = v; }
        if let Some(v) = changes.enrollment_number { s.enrollment_number = v; }
        if let Some(v) = changes.course { s.course = v; }
        if let Some(v) = changes.password_hash { s.password_hash = v; }
        if let Some(v) = changes.advisor_id { s.advisor_id = v; }
        Ok(Some(s.clone()))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, ServiceError> {
        let mut st = self.state.lock().await;
        match st.students.iter_mut().find(|s| s.email == email) {
            Some(s) => {
                s.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl RecoveryTokenRepository for InMemoryStore {
    async fn insert(&self, email: &str, token_hash: &str, expires_at: DateTime<Utc>) -> Result<RecoveryToken, ServiceError> {
        let mut st = self.state.lock().await;
        if st.tokens.iter().any(|t| t.token_hash == token_hash) {
            return Err(duplicate("password_recovery_token_token_hash_key"));
        }
        let token = RecoveryToken {
            id: st.next_id(),
            email: email.to_string(),
            token_hash: token_hash.to_string(),
            expires_at,
            used_at: None,
        };
        st.tokens.push(token.clone());
        Ok(token)
    }

    async fn claim(&self, token_hash: &str, now: DateTime<Utc>) -> Result<Option<RecoveryToken>, ServiceError> {
        let mut st = self.state.lock().await;
        let Some(t) = st.tokens.iter_mut().find(|t| t.token_hash == token_hash && t.is_redeemable(now)) else {
            return Ok(None);
        };
        t.used_at = Some(now);
        Ok(Some(t.clone()))
    }
}

/// Records every notification instead of delivering it.
#[derive(Default)]
pub struct CapturingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl CapturingNotifier {
    /// Most recent `(email, token)` pair.
    pub async fn last(&self) -> Option<(String, String)> { self.sent.lock().await.last().cloned() }
}

#[async_trait]
impl RecoveryNotifier for CapturingNotifier {
    async fn send_recovery(&self, email: &str, token: &str) -> Result<(), ServiceError> {
        self.sent.lock().await.push((email.to_string(), token.to_string()));
        Ok(())
    }
}

/// Seed helpers shared by unit tests, server tests and benches.
pub mod fixtures {
    use chrono::NaiveDate;

    use super::*;

    /// Plaintext password of every seeded student.
    pub const PASSWORD: &str = "password123";

    /// Insert an advisor and a student (with scholarship) whose password is [`PASSWORD`].
    pub async fn seed_student(store: &InMemoryStore, email: &str, course: &str) -> StudentRecord {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        let advisor = AdvisorRepository::insert(
            store,
            &CreateAdvisorInput { name: "Seed Advisor".into(), tax_id: format!("A-{}", &tag[..16]) },
        )
        .await
        .expect("seed advisor");
        let new = NewStudent {
            name: "Seed Student".into(),
            email: email.into(),
            tax_id: format!("S-{}", &tag[..16]),
            enrollment_number: format!("E-{tag}"),
            course: course.into(),
            password_hash: common::crypto::hash_password(PASSWORD).expect("hash seed password"),
            advisor_id: advisor.id,
        };
        let window = ScholarshipWindow {
            scholarship_starts_at: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
            scholarship_ends_at: NaiveDate::from_ymd_opt(2024, 12, 31).expect("date"),
        };
        store.insert_with_scholarship(new, window).await.expect("seed student").student
    }
}
