use serde::{Deserialize, Serialize};

use crate::student::domain::StudentRecord;

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Authenticated student (no credentials)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthStudent {
    pub id: i32,
    pub name: String,
    pub email: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub student: AuthStudent,
    pub token: String,
    pub expires_at: i64,
}

/// JWT payload; `sub` carries the student id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

impl Claims {
    pub fn student_id(&self) -> Option<i32> { self.sub.parse().ok() }
}

impl From<&StudentRecord> for AuthStudent {
    fn from(s: &StudentRecord) -> Self { Self { id: s.id, name: s.name.clone(), email: s.email.clone() } }
}
