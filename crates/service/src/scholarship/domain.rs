use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Funding period `[scholarship_starts_at, scholarship_ends_at)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipWindow {
    pub scholarship_starts_at: NaiveDate,
    pub scholarship_ends_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScholarshipInput {
    pub student_id: i32,
    #[serde(flatten)]
    pub window: ScholarshipWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: i32,
    pub student_id: i32,
    pub scholarship_starts_at: NaiveDate,
    pub scholarship_ends_at: NaiveDate,
}

/// Owner summary attached to scholarship listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRef {
    pub id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct ScholarshipWithStudent {
    pub scholarship: Scholarship,
    pub student: Option<StudentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScholarshipResponse {
    pub id: i32,
    pub student_id: i32,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub scholarship_starts_at: NaiveDate,
    pub scholarship_ends_at: NaiveDate,
}

impl From<ScholarshipWithStudent> for ScholarshipResponse {
    fn from(v: ScholarshipWithStudent) -> Self {
        let (student_name, student_email) = match v.student {
            Some(s) => (Some(s.name), Some(s.email)),
            None => (None, None),
        };
        Self {
            id: v.scholarship.id,
            student_id: v.scholarship.student_id,
            student_name,
            student_email,
            scholarship_starts_at: v.scholarship.scholarship_starts_at,
            scholarship_ends_at: v.scholarship.scholarship_ends_at,
        }
    }
}

impl From<models::scholarship::Model> for Scholarship {
    fn from(m: models::scholarship::Model) -> Self {
        Self {
            id: m.id,
            student_id: m.student_id,
            scholarship_starts_at: m.scholarship_starts_at,
            scholarship_ends_at: m.scholarship_ends_at,
        }
    }
}

impl From<models::student::Model> for StudentRef {
    fn from(m: models::student::Model) -> Self { Self { id: m.id, name: m.name, email: m.email } }
}
