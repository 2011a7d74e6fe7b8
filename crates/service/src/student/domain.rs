use serde::{Deserialize, Serialize};

use crate::article::domain::Article;
use crate::scholarship::domain::{Scholarship, ScholarshipWindow};

pub use models::student::{NewStudent, StudentChanges};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStudentInput {
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub enrollment_number: String,
    pub course: String,
    pub password: String,
    pub advisor_id: i32,
    #[serde(flatten)]
    pub scholarship: ScholarshipWindow,
}

/// Partial update keyed by `tax_id`; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStudentInput {
    pub tax_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub enrollment_number: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub advisor_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordInput {
    pub email: String,
    pub password: String,
}

/// Stored student row, password hash included. Never serialized to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub enrollment_number: String,
    pub course: String,
    pub password_hash: String,
    pub advisor_id: i32,
}

/// A student with its relations loaded.
#[derive(Debug, Clone)]
pub struct StudentProfile {
    pub student: StudentRecord,
    pub articles: Vec<Article>,
    pub scholarship: Option<Scholarship>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub tax_id: String,
    pub enrollment_number: String,
    pub course: String,
    pub advisor_id: i32,
    pub articles: Vec<Article>,
    pub scholarship: Option<Scholarship>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentFilter {
    All,
    Id(i32),
    Email(String),
    /// Case-insensitive substring match on the course name.
    CourseContains(String),
    Advisor(i32),
}

impl From<models::student::Model> for StudentRecord {
    fn from(m: models::student::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            tax_id: m.tax_id,
            enrollment_number: m.enrollment_number,
            course: m.course,
            password_hash: m.password,
            advisor_id: m.advisor_id,
        }
    }
}

impl From<StudentProfile> for StudentResponse {
    fn from(p: StudentProfile) -> Self {
        let s = p.student;
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            tax_id: s.tax_id,
            enrollment_number: s.enrollment_number,
            course: s.course,
            advisor_id: s.advisor_id,
            articles: p.articles,
            scholarship: p.scholarship,
        }
    }
}

/// Caller-facing message for a unique violation raised by the student or scholarship tables.
pub fn describe_duplicate(raw: &str) -> String {
    if raw.contains("email") {
        "Email already registered".into()
    } else if raw.contains("enrollment_number") {
        "Enrollment Number already registered".into()
    } else if raw.contains("tax_id") {
        "Tax ID already registered".into()
    } else if raw.contains("scholarship") {
        "Scholarship already registered for student".into()
    } else {
        "Duplicate value".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_messages_follow_constraint_names() {
        let pg = |c: &str| format!("duplicate key value violates unique constraint \"{c}\"");
        assert_eq!(describe_duplicate(&pg("student_email_key")), "Email already registered");
        assert_eq!(describe_duplicate(&pg("student_tax_id_key")), "Tax ID already registered");
        assert_eq!(describe_duplicate(&pg("student_enrollment_number_key")), "Enrollment Number already registered");
        assert_eq!(describe_duplicate(&pg("scholarship_student_id_key")), "Scholarship already registered for student");
    }

    #[test]
    fn create_input_reads_flat_json() {
        let input: CreateStudentInput = serde_json::from_value(serde_json::json!({
            "name": "Lin", "email": "lin@example.com", "tax_id": "1", "enrollment_number": "E1",
            "course": "Math", "password": "password123", "advisor_id": 3,
            "scholarship_starts_at": "2024-01-01", "scholarship_ends_at": "2024-12-31"
        }))
        .unwrap();
        assert_eq!(input.advisor_id, 3);
        assert!(input.scholarship.scholarship_starts_at < input.scholarship.scholarship_ends_at);
    }
}
